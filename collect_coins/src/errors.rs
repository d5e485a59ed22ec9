use crate::{Location, Piece};

/// The error type for [`GameState::make_move()`](crate::GameState::make_move),
/// i.e. for a move that must not be applied to the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    NotPlayersTurn { player: usize, turn: usize },
    OutOfBounds { to: Location },
    Occupied { to: Location },
    UnreachableForPiece {
        piece: Piece,
        from: Location,
        to: Location,
    },
    PassedWithLegalMoves,
    ActionIndexOutOfRange { index: usize },
}

impl std::error::Error for IllegalMove {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::NotPlayersTurn { player, turn } => write!(
                f,
                "Player {} tried to move, but it is player {}'s turn",
                player, turn
            ),
            IllegalMove::OutOfBounds { to } => {
                write!(f, "The destination {} is outside of the board", to)
            }
            IllegalMove::Occupied { to } => {
                write!(f, "The destination {} is occupied by a piece", to)
            }
            IllegalMove::UnreachableForPiece { piece, from, to } => write!(
                f,
                "A {} cannot move from {} to {}",
                piece, from, to
            ),
            IllegalMove::PassedWithLegalMoves => {
                write!(f, "Tried to pass although a legal move exists")
            }
            IllegalMove::ActionIndexOutOfRange { index } => write!(
                f,
                "The action index {} is not in the range 0..64",
                index
            ),
        }
    }
}

/// The error type for parsing a [`Piece`] from its name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsePieceError {
    pub name: String,
}

impl std::error::Error for ParsePieceError {}

impl std::fmt::Display for ParsePieceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown piece '{}', expected \"rock\" or \"knight\"",
            self.name
        )
    }
}
