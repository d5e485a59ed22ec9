use collect_coins::IllegalMove;

use crate::AgentId;

#[derive(Debug)]
/// The error type for driving an environment.
///
/// All of these are contract violations by the caller. In-game outcomes,
/// such as the end of an episode, are reported through ordinary return values.
pub enum EnvError {
    /// The move cannot be applied for the agent whose turn it is.
    IllegalMove { agent: AgentId, err: IllegalMove },
    /// An action was submitted from outside while an auto-played agent was
    /// supposed to act.
    NotControlledAgentsTurn { agent: AgentId },
    /// Every agent is auto-played, so there is nobody left to control.
    NoControlledAgent,
    UnknownAgent { name: String },
    /// An index of the four-way action space that is not in `0..4`.
    DirectionIndexOutOfRange { index: usize },
}

impl std::error::Error for EnvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvError::IllegalMove { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::IllegalMove { agent, err: _ } => {
                write!(f, "Illegal move by {}", agent)
            }
            EnvError::NotControlledAgentsTurn { agent } => write!(
                f,
                "Expected it to be the controlled agent's turn, got {}",
                agent
            ),
            EnvError::NoControlledAgent => {
                write!(f, "All agents are auto-played, none is left to control")
            }
            EnvError::UnknownAgent { name } => write!(f, "Unknown agent '{}'", name),
            EnvError::DirectionIndexOutOfRange { index } => {
                write!(f, "The direction index {} is not in the range 0..4", index)
            }
        }
    }
}
