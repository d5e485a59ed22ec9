use collect_coins::{Move, Piece, NUM_CELLS};
use collect_coins_env::{GreedyPolicy, Observation, Policy, RandomPolicy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The policies that can take part in a tournament.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PolicyKind {
    /// A uniformly random legal move
    Random,
    /// Collects coins whenever it can
    Greedy,
    /// Any of the 64 cells, legal or not
    AnyCell,
}

impl PolicyKind {
    pub fn build(self, piece: Piece, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::seeded(piece, seed)),
            PolicyKind::Greedy => Box::new(GreedyPolicy::seeded(piece, seed)),
            PolicyKind::AnyCell => Box::new(AnyCellPolicy {
                rng: StdRng::seed_from_u64(seed),
            }),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PolicyKind::Random => "random",
            PolicyKind::Greedy => "greedy",
            PolicyKind::AnyCell => "any-cell",
        };
        write!(f, "{}", name)
    }
}

/// Picks an index of the flattened action space without looking at the
/// board, like an untrained agent would. Relies on the guard to turn its
/// actions into legal ones.
pub struct AnyCellPolicy {
    rng: StdRng,
}

impl Policy for AnyCellPolicy {
    fn act(&mut self, _observation: &Observation) -> Move {
        let index = self.rng.gen_range(0..NUM_CELLS);
        Move::try_from(index).unwrap_or(Move::Pass)
    }
}
