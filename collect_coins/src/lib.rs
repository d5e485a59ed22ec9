pub use board::*;
pub use cells::*;
pub use errors::*;
pub use game::*;
pub use piece::*;
pub use protocol_types::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod cells;
mod errors;
mod game;
mod piece;
mod protocol_types;
mod visualization;
