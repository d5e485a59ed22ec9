use std::cmp::Ordering;

use crate::{Board, CellSet, IllegalMove, Location, Move, Piece};

pub const NUM_PLAYERS: usize = 2;

/// Where the pieces of player 0 and player 1 start.
pub const STARTING_LOCATIONS: [Location; NUM_PLAYERS] =
    [Location::new(0, 0), Location::new(7, 7)];

/// The state for a single player during one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub piece: Piece,
    pub location: Location,
    /// The number of coins collected so far.
    pub coins: u32,
}

/// Summarizes the outcome of playing a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Passed,
    Moved { coin_collected: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    WonByPlayer { player_idx: usize },
    Tie,
}

/// A game of collect-coins between player 0 and player 1.
///
/// The players take turns, starting with player 0. Every move goes to a free
/// cell reachable by the player's piece, collecting the coin there if there
/// is one. The game is over once all coins have been collected.
#[derive(Clone, Debug)]
pub struct GameState {
    players: [PlayerState; NUM_PLAYERS],
    board: Board,
    /// The index of the player who has to move next.
    turn: usize,
}

impl GameState {
    /// A new game with the pieces on their starting locations and a coin on
    /// every other cell.
    pub fn new(pieces: [Piece; NUM_PLAYERS]) -> Self {
        Self {
            players: [0, 1].map(|idx| PlayerState {
                piece: pieces[idx],
                location: STARTING_LOCATIONS[idx],
                coins: 0,
            }),
            board: Board::new(&STARTING_LOCATIONS),
            turn: 0,
        }
    }

    /// A game in progress, with the given coins left on the board.
    ///
    /// Coins on the players' cells are dropped, and collected coins start at 0.
    ///
    /// Panics if the locations are (obviously) invalid.
    pub fn from_position(
        pieces: [Piece; NUM_PLAYERS],
        locations: [Location; NUM_PLAYERS],
        coins: CellSet,
        turn: usize,
    ) -> Self {
        assert!(locations.iter().all(|loc| loc.is_in_bounds()));
        assert_ne!(locations[0], locations[1]);
        assert!(turn < NUM_PLAYERS);
        Self {
            players: [0, 1].map(|idx| PlayerState {
                piece: pieces[idx],
                location: locations[idx],
                coins: 0,
            }),
            board: Board::with_coins(coins.remove(locations[0]).remove(locations[1])),
            turn,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The index of the player who has to move next.
    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Panics if `player` is not 0 or 1.
    pub fn player(&self, player: usize) -> &PlayerState {
        &self.players[player]
    }

    pub fn coins(&self) -> [u32; NUM_PLAYERS] {
        [self.players[0].coins, self.players[1].coins]
    }

    pub fn locations(&self) -> [Location; NUM_PLAYERS] {
        [self.players[0].location, self.players[1].location]
    }

    /// Checks whether `player` could move to `to`, and if not, why.
    ///
    /// Does not check whose turn it is. Panics if `player` is not 0 or 1.
    pub fn check_move(&self, player: usize, to: Location) -> Result<(), IllegalMove> {
        if !to.is_in_bounds() {
            return Err(IllegalMove::OutOfBounds { to });
        }
        // Pieces never share a cell, with or without a coin on it
        if self.players.iter().any(|p| p.location == to) {
            return Err(IllegalMove::Occupied { to });
        }
        let PlayerState {
            piece, location, ..
        } = self.players[player];
        if !piece.can_move(location, to) {
            return Err(IllegalMove::UnreachableForPiece {
                piece,
                from: location,
                to,
            });
        }
        Ok(())
    }

    pub fn valid_move(&self, player: usize, to: Location) -> bool {
        self.check_move(player, to).is_ok()
    }

    /// All destinations `player` could move to right now.
    pub fn legal_moves(&self, player: usize) -> CellSet {
        let PlayerState {
            piece, location, ..
        } = self.players[player];
        let occupied = CellSet::from_iter(self.locations());
        piece.destinations(location) & !occupied
    }

    pub fn has_legal_move(&self, player: usize) -> bool {
        !self.legal_moves(player).is_empty()
    }

    /// Plays a move for `player` and hands the turn to the other player.
    ///
    /// Fails without changing anything if it is not `player`'s turn or the
    /// destination is not valid. A [`Move::Pass`] is accepted whenever it is
    /// the player's turn.
    pub fn make_move(&mut self, player: usize, mv: Move) -> Result<MoveOutcome, IllegalMove> {
        if player != self.turn {
            return Err(IllegalMove::NotPlayersTurn {
                player,
                turn: self.turn,
            });
        }
        let outcome = match mv {
            Move::Pass => MoveOutcome::Passed,
            Move::To(to) => {
                self.check_move(player, to)?;
                let coin_collected = self.board.take_coin(to);
                let state = &mut self.players[player];
                if coin_collected {
                    state.coins += 1;
                }
                state.location = to;
                MoveOutcome::Moved { coin_collected }
            }
        };
        self.turn = 1 - self.turn;
        Ok(outcome)
    }

    /// The game is over once no coin is left on the board.
    pub fn is_done(&self) -> bool {
        self.board.is_empty()
    }

    /// Who won, or `None` while the game is still running.
    pub fn result(&self) -> Option<GameResult> {
        if !self.is_done() {
            return None;
        }
        let [coins_0, coins_1] = self.coins();
        Some(match coins_0.cmp(&coins_1) {
            Ordering::Less => GameResult::WonByPlayer { player_idx: 1 },
            Ordering::Equal => GameResult::Tie,
            Ordering::Greater => GameResult::WonByPlayer { player_idx: 0 },
        })
    }
}
