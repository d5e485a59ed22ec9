use serde::{Deserialize, Serialize};

use crate::IllegalMove;

/// Number of rows (and columns) of the board.
pub const BOARD_SIZE: i8 = 8;

/// Number of cells on the board, i.e. the size of the flattened action space.
pub const NUM_CELLS: usize = 64;

/// A cell on the board, given as (row, column).
///
/// Coordinates outside of `0..BOARD_SIZE` can be represented, so that an
/// out-of-bounds destination can be proposed and then rejected by
/// [`GameState::valid_move()`](crate::GameState::valid_move).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub row: i8,
    pub col: i8,
}

impl Location {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn is_in_bounds(self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// The row-major index of this cell, or `None` if it is off the board.
    pub fn to_index(self) -> Option<usize> {
        self.is_in_bounds()
            .then(|| self.row as usize * BOARD_SIZE as usize + self.col as usize)
    }

    /// Inverse of [`Self::to_index()`]. The index must be below [`NUM_CELLS`].
    pub(crate) fn from_index(index: u8) -> Self {
        debug_assert!((index as usize) < NUM_CELLS);
        Self {
            row: (index / BOARD_SIZE as u8) as i8,
            col: (index % BOARD_SIZE as u8) as i8,
        }
    }

    /// The location shifted by the given amounts. May leave the board.
    #[must_use]
    pub fn offset(self, d_row: i8, d_col: i8) -> Self {
        Self {
            row: self.row.saturating_add(d_row),
            col: self.col.saturating_add(d_col),
        }
    }

    /// All cells of the board in row-major order.
    pub fn all() -> impl Iterator<Item = Location> {
        (0..NUM_CELLS as u8).map(Location::from_index)
    }
}

impl From<(i8, i8)> for Location {
    fn from((row, col): (i8, i8)) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// What a player does on their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    /// Do nothing except hand the turn over to the other player.
    ///
    /// Submitted on behalf of agents whose episode is already over, or by a
    /// piece that has no legal destination.
    Pass,
    /// Move the piece to this cell.
    To(Location),
}

impl Move {
    pub fn destination(self) -> Option<Location> {
        match self {
            Move::Pass => None,
            Move::To(location) => Some(location),
        }
    }
}

impl From<Location> for Move {
    fn from(location: Location) -> Self {
        Move::To(location)
    }
}

impl From<(i8, i8)> for Move {
    fn from(coords: (i8, i8)) -> Self {
        Move::To(Location::from(coords))
    }
}

/// Converts an index of the flattened 64-way action space into a move,
/// using `(index / 8, index % 8)` as the destination.
impl TryFrom<usize> for Move {
    type Error = IllegalMove;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        if index >= NUM_CELLS {
            return Err(IllegalMove::ActionIndexOutOfRange { index });
        }
        Ok(Move::To(Location::from_index(index as u8)))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Pass => write!(f, "pass"),
            Move::To(location) => write!(f, "{}", location),
        }
    }
}
