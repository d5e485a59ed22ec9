use crate::{AgentId, AgentRecord, EnvError, Info};

/// What an agent gets back after acting.
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult<O> {
    pub observation: O,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Info,
}

impl<O> StepResult<O> {
    /// Whether the episode is over for this agent.
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// An environment in which agents act one at a time, in a fixed cyclic order.
///
/// Exactly one agent is selected at any point, and [`AecEnv::step()`] applies
/// an action on its behalf. Rewards and termination are tracked per agent in
/// an [`AgentRecord`].
pub trait AecEnv {
    type Action: Copy + std::fmt::Debug;
    type Observation;

    /// Starts a new episode. A seed makes the episode reproducible.
    fn reset(&mut self, seed: Option<u64>);

    /// Acts for the currently selected agent and selects the next one.
    fn step(&mut self, action: Self::Action) -> Result<(), EnvError>;

    /// The agent that acts next.
    fn agent_selection(&self) -> AgentId;

    fn observe(&self, agent: AgentId) -> Self::Observation;

    fn record(&self, agent: AgentId) -> &AgentRecord;

    /// A human-readable dump of the current state.
    fn render(&self) -> String;

    /// Everything the selected agent needs before acting: its observation,
    /// the reward accrued since it last acted, and whether it is done.
    fn last(&self) -> StepResult<Self::Observation> {
        self.result_for(self.agent_selection())
    }

    fn result_for(&self, agent: AgentId) -> StepResult<Self::Observation> {
        let record = self.record(agent);
        StepResult {
            observation: self.observe(agent),
            reward: record.cumulative_reward,
            terminated: record.status.is_terminated(),
            truncated: record.status.is_truncated(),
            info: record.info.clone(),
        }
    }

    /// Whether every agent is terminated or truncated.
    fn is_episode_over(&self) -> bool {
        AgentId::ALL
            .into_iter()
            .all(|agent| self.record(agent).status.is_finished())
    }
}

/// Lets a wrapper ask the environment which actions are legal.
pub trait ActionValidity: AecEnv {
    fn check_action_valid(&self, action: Self::Action, agent: AgentId) -> bool;

    /// A legal action for `agent`, used in place of the illegal `action`.
    fn provide_alternative_valid_action(
        &mut self,
        action: Self::Action,
        agent: AgentId,
    ) -> Self::Action;
}
