use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CellSet, Location, ParsePieceError};

/// The kind of piece a player moves around the board.
///
/// Movement rules ignore the board entirely: occupancy and bounds are
/// checked by [`GameState`](crate::GameState).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Piece {
    /// Steps exactly one cell up, down, left or right.
    Rock,
    /// Jumps like a chess knight.
    Knight,
}

const ROCK_STEPS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

impl Piece {
    pub const ALL: [Piece; 2] = [Piece::Rock, Piece::Knight];

    /// Whether this piece may move from `from` to `to` on an empty board.
    pub fn can_move(self, from: Location, to: Location) -> bool {
        let d_row = (i16::from(to.row) - i16::from(from.row)).abs();
        let d_col = (i16::from(to.col) - i16::from(from.col)).abs();
        match self {
            Piece::Rock => matches!((d_row, d_col), (1, 0) | (0, 1)),
            Piece::Knight => matches!((d_row, d_col), (1, 2) | (2, 1)),
        }
    }

    /// All on-board cells this piece could move to from `from`, ignoring
    /// where the other piece stands.
    pub fn destinations(self, from: Location) -> CellSet {
        self.offsets()
            .iter()
            .map(|&(d_row, d_col)| from.offset(d_row, d_col))
            .collect()
    }

    /// The letter used when drawing the board.
    pub fn symbol(self) -> char {
        match self {
            Piece::Rock => 'R',
            Piece::Knight => 'K',
        }
    }

    fn offsets(self) -> &'static [(i8, i8)] {
        match self {
            Piece::Rock => &ROCK_STEPS,
            Piece::Knight => &KNIGHT_JUMPS,
        }
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Piece::Rock),
            "knight" => Ok(Piece::Knight),
            _ => Err(ParsePieceError {
                name: String::from(s),
            }),
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Piece::Rock => write!(f, "rock"),
            Piece::Knight => write!(f, "knight"),
        }
    }
}
