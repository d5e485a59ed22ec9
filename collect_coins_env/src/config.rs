use std::path::Path;

use collect_coins::{Piece, NUM_PLAYERS};
use serde::{Deserialize, Serialize};

/// Configuration of a [`CollectCoinsEnv`](crate::CollectCoinsEnv).
///
/// Every field has a default, so a JSON file only needs to list what differs:
///
/// ```
/// use collect_coins::Piece;
/// use collect_coins_env::EnvConfig;
///
/// let config: EnvConfig = serde_json::from_str(r#"{ "pieces": ["knight", "rock"] }"#).unwrap();
/// assert_eq!(config.pieces, [Piece::Knight, Piece::Rock]);
/// assert_eq!(config.max_rounds, Some(200));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvConfig {
    /// The pieces of player 0 and player 1.
    pub pieces: [Piece; NUM_PLAYERS],
    /// Include a mask of the legal destinations in every observation.
    pub with_mask: bool,
    /// Truncate the episode once more than this many rounds were played
    /// without the game ending. `None` never truncates.
    pub max_rounds: Option<u32>,
    /// The reward for winning the game. Losing gives the negated value, a
    /// draw gives 0.
    pub terminal_reward: f32,
    /// The reward per coin collected during a round that did not end the game.
    pub shaping_scale: f32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            pieces: [Piece::Rock, Piece::Rock],
            with_mask: false,
            max_rounds: Some(200),
            terminal_reward: 1.0,
            shaping_scale: 0.01,
        }
    }
}

impl EnvConfig {
    pub fn with_pieces(pieces: [Piece; NUM_PLAYERS]) -> Self {
        Self {
            pieces,
            ..Self::default()
        }
    }

    /// The settings of the single-agent variant of the game: a win is worth
    /// 100, every coin is worth 1, and episodes are never truncated.
    pub fn single_agent(pieces: [Piece; NUM_PLAYERS]) -> Self {
        Self {
            pieces,
            with_mask: false,
            max_rounds: None,
            terminal_reward: 100.0,
            shaping_scale: 1.0,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)
            .map_err(|err| anyhow::anyhow!("Invalid config '{}': {}", path.display(), err))?;
        Ok(config)
    }
}
