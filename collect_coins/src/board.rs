use crate::{CellSet, Location, BOARD_SIZE};

/// The 8×8 board, tracking which cells still hold a coin.
///
/// Coins are only ever removed, never added back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    coins: CellSet,
}

impl Board {
    /// A board with a coin on every cell except the given ones.
    pub fn new(empty_cells: &[Location]) -> Self {
        let coins = empty_cells
            .iter()
            .fold(CellSet::full(), |coins, &loc| coins.remove(loc));
        Self { coins }
    }

    /// A board with coins exactly on the given cells.
    pub fn with_coins(coins: CellSet) -> Self {
        Self { coins }
    }

    pub fn has_coin(&self, location: Location) -> bool {
        self.coins.contains(location)
    }

    /// Removes the coin at `location`, returning whether there was one.
    pub(crate) fn take_coin(&mut self, location: Location) -> bool {
        let had_coin = self.coins.contains(location);
        self.coins = self.coins.remove(location);
        had_coin
    }

    /// The cells that still hold a coin.
    pub fn coins(&self) -> CellSet {
        self.coins
    }

    pub fn coins_left(&self) -> u32 {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// The occupancy grid, `grid[row][col]` being `true` if a coin is there.
    pub fn to_grid(&self) -> [[bool; BOARD_SIZE as usize]; BOARD_SIZE as usize] {
        let mut grid = [[false; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        for Location { row, col } in self.coins {
            grid[row as usize][col as usize] = true;
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_leaves_given_cells_empty() {
        let board = Board::new(&[Location::new(0, 0), Location::new(7, 7)]);
        assert_eq!(board.coins_left(), 62);
        assert!(!board.has_coin(Location::new(0, 0)));
        assert!(!board.has_coin(Location::new(7, 7)));
        assert!(board.has_coin(Location::new(0, 1)));
        let grid = board.to_grid();
        assert!(!grid[0][0]);
        assert!(grid[3][5]);
        assert_eq!(grid.iter().flatten().filter(|c| **c).count(), 62);
    }

    #[test]
    fn coins_are_taken_once() {
        let mut board = Board::new(&[]);
        let loc = Location::new(4, 2);
        assert!(board.take_coin(loc));
        assert!(!board.take_coin(loc));
        assert_eq!(board.coins_left(), 63);
        assert!(!board.is_empty());
    }
}
