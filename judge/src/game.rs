use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use collect_coins_env::{
    AgentId, CollectCoinsEnv, EnsureValidAction, EnvConfig, Policies, SingleAgentEnv,
};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, trace};

use crate::PolicyKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    WonByPlayer { player_idx: usize },
    Tie,
    /// The round limit was hit before all coins were collected.
    Truncated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameRecord {
    pub result: GameResult,
    pub coins: [u32; 2],
    /// Settled rounds that did not end the game.
    pub rounds: u32,
    /// How many actions the guard had to replace.
    pub substitutions: usize,
}

/// Plays one episode. `player_0` is stepped from here, `player_1` is
/// auto-played by the single-agent adapter, and both go through the guard.
///
/// Returns an error only if an action reaches the environment that it
/// refuses, which the guard rules out.
pub fn play_game(
    rng: &mut StdRng,
    policies: [PolicyKind; 2],
    config: &EnvConfig,
) -> anyhow::Result<GameRecord> {
    let substitutions = Rc::new(Cell::new(0));
    let counter = Rc::clone(&substitutions);
    let env = EnsureValidAction::with_env_rules(CollectCoinsEnv::new(config.clone()), move |_| {
        counter.set(counter.get() + 1)
    });

    let mut controlled = policies[0].build(config.pieces[0], rng.gen());
    let mut act_others: Policies<_, _> = BTreeMap::new();
    act_others.insert(
        AgentId::PLAYER_1,
        policies[1].build(config.pieces[1], rng.gen()),
    );
    let mut env = SingleAgentEnv::new(env, act_others)?;

    let (mut observation, _info) = env.reset(Some(rng.gen()))?;
    loop {
        let step = env.step(controlled.act(&observation))?;
        trace!("\n{}", env.render());
        if step.done() {
            break;
        }
        observation = step.observation;
    }

    let env = env.into_inner().into_inner();
    let game = env.game();
    let result = match game.result() {
        Some(collect_coins::GameResult::WonByPlayer { player_idx }) => {
            GameResult::WonByPlayer { player_idx }
        }
        Some(collect_coins::GameResult::Tie) => GameResult::Tie,
        None => GameResult::Truncated,
    };
    let record = GameRecord {
        result,
        coins: game.coins(),
        rounds: env.num_rounds(),
        substitutions: substitutions.get(),
    };
    debug!(
        ?record.result,
        ?record.coins,
        record.rounds,
        record.substitutions,
        "Game over"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use collect_coins::Piece;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn games_are_played_to_the_end() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = EnvConfig::with_pieces([Piece::Rock, Piece::Knight]);
        for policies in [
            [PolicyKind::Random, PolicyKind::Greedy],
            [PolicyKind::Greedy, PolicyKind::AnyCell],
        ] {
            let record = play_game(&mut rng, policies, &config).unwrap();
            match record.result {
                GameResult::WonByPlayer { player_idx } => {
                    assert!(record.coins[player_idx] > record.coins[1 - player_idx])
                }
                GameResult::Tie => assert_eq!(record.coins[0], record.coins[1]),
                GameResult::Truncated => assert!(record.rounds > 200),
            }
            if policies == [PolicyKind::Random, PolicyKind::Greedy] {
                assert_eq!(record.substitutions, 0);
            }
        }
    }

    #[test]
    fn any_cell_needs_the_guard() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = EnvConfig::default();
        let policies = [PolicyKind::AnyCell, PolicyKind::AnyCell];
        let record = play_game(&mut rng, policies, &config).unwrap();
        assert!(record.substitutions > 0);
    }

    #[test]
    fn seeded_games_repeat() {
        let config = EnvConfig::with_pieces([Piece::Knight, Piece::Knight]);
        let play = || {
            let mut rng = StdRng::seed_from_u64(99);
            play_game(&mut rng, [PolicyKind::Random, PolicyKind::Random], &config).unwrap()
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn short_games_are_truncated() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = EnvConfig {
            max_rounds: Some(3),
            ..EnvConfig::default()
        };
        let policies = [PolicyKind::Greedy, PolicyKind::Greedy];
        let record = play_game(&mut rng, policies, &config).unwrap();
        assert_eq!(record.result, GameResult::Truncated);
        assert_eq!(record.rounds, 4);
        assert_eq!(record.coins.iter().sum::<u32>(), 8);
    }
}
