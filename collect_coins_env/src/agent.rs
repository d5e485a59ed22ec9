use std::str::FromStr;

use collect_coins::NUM_PLAYERS;
use serde::{Deserialize, Serialize};

use crate::EnvError;

/// Auxiliary per-agent information. Empty unless stated otherwise.
pub type Info = serde_json::Map<String, serde_json::Value>;

/// Identifies one of the two agents, `player_0` or `player_1`.
///
/// The agent with index `i` plays for player `i` of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentId(u8);

impl AgentId {
    pub const PLAYER_0: AgentId = AgentId(0);
    pub const PLAYER_1: AgentId = AgentId(1);

    /// All agents, in turn order.
    pub const ALL: [AgentId; NUM_PLAYERS] = [AgentId::PLAYER_0, AgentId::PLAYER_1];

    /// The index of the player this agent controls.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn other(self) -> AgentId {
        AgentId(1 - self.0)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player_{}", self.0)
    }
}

impl FromStr for AgentId {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentId::ALL
            .into_iter()
            .find(|agent| agent.to_string() == s)
            .ok_or_else(|| EnvError::UnknownAgent {
                name: String::from(s),
            })
    }
}

impl TryFrom<String> for AgentId {
    type Error = EnvError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<AgentId> for String {
    fn from(agent: AgentId) -> String {
        agent.to_string()
    }
}

/// Where an agent is in its episode.
///
/// Once an agent is terminated or truncated it stays that way until the
/// next reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Active,
    /// The game is over.
    Terminated,
    /// The episode hit the round limit before the game was over.
    Truncated,
}

impl AgentStatus {
    pub fn is_terminated(self) -> bool {
        self == AgentStatus::Terminated
    }

    pub fn is_truncated(self) -> bool {
        self == AgentStatus::Truncated
    }

    pub fn is_finished(self) -> bool {
        self != AgentStatus::Active
    }
}

/// The bookkeeping the scheduler keeps for every agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentRecord {
    pub status: AgentStatus,
    /// The reward of the most recently settled round. Cleared while a round
    /// is only partially played.
    pub reward: f32,
    /// The rewards accrued since this agent last acted.
    pub cumulative_reward: f32,
    pub info: Info,
}

impl AgentRecord {
    /// Moves an active agent into a final status. Has no effect on an agent
    /// that is already finished.
    pub(crate) fn finish(&mut self, status: AgentStatus) {
        if self.status == AgentStatus::Active {
            self.status = status;
        }
    }
}
