use crate::{GameState, Location, BOARD_SIZE};

/// Draws the board as text: `$` marks a coin, and the pieces are drawn as
/// `w` (player 0) or `b` (player 1) followed by the piece's letter. The
/// collected coins are printed underneath as `coins_0/coins_1`.
pub fn visualize_game(game: &GameState) -> String {
    let horizontal = "-".repeat(BOARD_SIZE as usize * 4 + 1);
    let mut result = horizontal.clone();
    result.push('\n');
    for row in 0..BOARD_SIZE {
        let mut cells: Vec<String> = (0..BOARD_SIZE)
            .map(|col| {
                if game.board().has_coin(Location::new(row, col)) {
                    String::from(" $")
                } else {
                    String::from("  ")
                }
            })
            .collect();
        for (player_idx, color) in ['w', 'b'].into_iter().enumerate() {
            let player = game.player(player_idx);
            if player.location.row == row {
                cells[player.location.col as usize] = format!("{}{}", color, player.piece.symbol());
            }
        }
        result += &format!("|{} |\n", cells.join(" |"));
        result += &horizontal;
        result.push('\n');
    }
    let [coins_0, coins_1] = game.coins();
    result += &format!("\n{}/{}", coins_0, coins_1);
    result
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", visualize_game(self))
    }
}
