use std::cmp::Ordering;

use collect_coins::{CellSet, Location, Move, Piece};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::Observation;

/// Chooses an action from an observation.
///
/// This is what auto-plays the agents that are not under outside control,
/// see [`SingleAgentEnv`](crate::SingleAgentEnv). Any closure taking an
/// observation is a policy as well.
pub trait Policy<O = Observation, A = Move> {
    fn act(&mut self, observation: &O) -> A;
}

impl<O, A, F> Policy<O, A> for F
where
    F: FnMut(&O) -> A,
{
    fn act(&mut self, observation: &O) -> A {
        self(observation)
    }
}

/// The destinations the observing agent can move to. Uses the mask if the
/// observation carries one.
pub fn candidate_moves(piece: Piece, observation: &Observation) -> CellSet {
    observation.mask.unwrap_or_else(|| {
        piece
            .destinations(observation.player)
            .remove(observation.other_player)
    })
}

/// Moves to a uniformly random legal destination, and passes if there is none.
pub struct RandomPolicy {
    piece: Piece,
    rng: StdRng,
}

impl RandomPolicy {
    /// `piece` is the piece of the agent this policy plays for.
    pub fn new(piece: Piece) -> Self {
        Self {
            piece,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(piece: Piece, seed: u64) -> Self {
        Self {
            piece,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, observation: &Observation) -> Move {
        let candidates = Vec::from_iter(candidate_moves(self.piece, observation));
        candidates
            .choose(&mut self.rng)
            .map_or(Move::Pass, |&to| Move::To(to))
    }
}

/// Collects a coin whenever possible. Among equally good moves, the ones
/// from where another coin can be reached next are preferred, and the
/// rest is left to chance.
pub struct GreedyPolicy {
    piece: Piece,
    rng: StdRng,
}

impl GreedyPolicy {
    pub fn new(piece: Piece) -> Self {
        Self {
            piece,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(piece: Piece, seed: u64) -> Self {
        Self {
            piece,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn score(&self, observation: &Observation, to: Location) -> usize {
        let coin_here = observation.board.contains(to);
        let coins_after = self.piece.destinations(to) & observation.board.remove(to);
        (if coin_here { 2 } else { 0 }) + (if coins_after.is_empty() { 0 } else { 1 })
    }
}

impl Policy for GreedyPolicy {
    fn act(&mut self, observation: &Observation) -> Move {
        let mut top_choices: Vec<Location> = Vec::new();
        let mut top_score = 0;
        for to in candidate_moves(self.piece, observation) {
            let score = self.score(observation, to);
            match score.cmp(&top_score) {
                Ordering::Less => {}
                Ordering::Equal => top_choices.push(to),
                Ordering::Greater => {
                    top_choices = vec![to];
                    top_score = score;
                }
            }
        }
        top_choices
            .choose(&mut self.rng)
            .map_or(Move::Pass, |&to| Move::To(to))
    }
}
