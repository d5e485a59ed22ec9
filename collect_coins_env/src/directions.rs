use collect_coins::{Location, Move};
use serde::{Deserialize, Serialize};

use crate::{AecEnv, AgentId, AgentRecord, EnvError};

/// One step along an axis. Up and down change the row, left and right the
/// column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// In the order of the action indices.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(d_row, d_col)`
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The cell next to `location` in this direction.
    pub fn step_from(self, location: Location) -> Location {
        let (d_row, d_col) = self.delta();
        location.offset(d_row, d_col)
    }
}

impl TryFrom<usize> for Direction {
    type Error = EnvError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(index)
            .copied()
            .ok_or(EnvError::DirectionIndexOutOfRange { index })
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{}", name)
    }
}

pub type LocateFn<E> = fn(&E, AgentId) -> Location;

/// Lets agents act with a [`Direction`] instead of a destination, which
/// suits rocks.
///
/// The destination is the cell next to the acting agent's piece in that
/// direction. `locate` tells where that piece is. Agents whose episode is
/// over step with a pass, since their action is ignored anyway.
pub struct UpDownLeftRight<E, L = LocateFn<E>> {
    env: E,
    locate: L,
}

impl<E, L> UpDownLeftRight<E, L>
where
    E: AecEnv<Action = Move>,
    L: Fn(&E, AgentId) -> Location,
{
    pub fn new(env: E, locate: L) -> Self {
        Self { env, locate }
    }

    /// The move `direction` stands for if `agent` were to act now.
    pub fn to_move(&self, direction: Direction, agent: AgentId) -> Move {
        if self.env.record(agent).status.is_finished() {
            return Move::Pass;
        }
        Move::To(direction.step_from((self.locate)(&self.env, agent)))
    }

    pub fn inner(&self) -> &E {
        &self.env
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E, L> AecEnv for UpDownLeftRight<E, L>
where
    E: AecEnv<Action = Move>,
    L: Fn(&E, AgentId) -> Location,
{
    type Action = Direction;
    type Observation = E::Observation;

    fn reset(&mut self, seed: Option<u64>) {
        self.env.reset(seed)
    }

    fn step(&mut self, action: Direction) -> Result<(), EnvError> {
        let mv = self.to_move(action, self.env.agent_selection());
        self.env.step(mv)
    }

    fn agent_selection(&self) -> AgentId {
        self.env.agent_selection()
    }

    fn observe(&self, agent: AgentId) -> E::Observation {
        self.env.observe(agent)
    }

    fn record(&self, agent: AgentId) -> &AgentRecord {
        self.env.record(agent)
    }

    fn render(&self) -> String {
        self.env.render()
    }
}
