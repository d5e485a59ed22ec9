mod game;
mod policies;
pub use game::*;
pub use policies::*;
