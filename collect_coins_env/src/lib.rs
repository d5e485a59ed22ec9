//! Multi-agent and single-agent environments around a game of collect-coins.
//!
//! The layers compose from the inside out:
//! [`CollectCoinsEnv`] schedules the two players turn by turn,
//! [`EnsureValidAction`] replaces illegal actions before they reach it, and
//! [`SingleAgentEnv`] auto-plays every agent except one.

mod agent;
mod config;
mod directions;
mod env;
mod error;
mod guard;
mod observation;
mod policy;
mod scheduler;
mod single_agent;

pub use agent::*;
pub use config::*;
pub use directions::*;
pub use env::*;
pub use error::*;
pub use guard::*;
pub use observation::*;
pub use policy::*;
pub use scheduler::*;
pub use single_agent::*;
