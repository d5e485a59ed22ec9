use collect_coins::{Board, CellSet, GameState, Location, BOARD_SIZE};
use serde::{Deserialize, Serialize};

/// What one agent gets to see of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// The cells that still hold a coin.
    pub board: CellSet,
    /// The location of the observing agent's piece.
    pub player: Location,
    /// The location of the other agent's piece.
    pub other_player: Location,
    /// The destinations the observing agent could move to, if masking is
    /// enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub mask: Option<CellSet>,
}

impl Observation {
    pub fn new(game: &GameState, player_idx: usize, with_mask: bool) -> Self {
        let [own, other] = [player_idx, 1 - player_idx].map(|idx| game.player(idx).location);
        Self {
            board: game.board().coins(),
            player: own,
            other_player: other,
            mask: with_mask.then(|| game.legal_moves(player_idx)),
        }
    }

    /// The coin occupancy as a grid, `grid[row][col]`.
    pub fn board_grid(&self) -> [[bool; BOARD_SIZE as usize]; BOARD_SIZE as usize] {
        Board::with_coins(self.board).to_grid()
    }

    /// The legality mask flattened over all 64 cells in row-major order.
    pub fn mask_flags(&self) -> Option<Vec<bool>> {
        self.mask.map(CellSet::to_flags)
    }
}
