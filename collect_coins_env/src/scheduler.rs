use std::cmp::Ordering;

use collect_coins::{visualize_game, CellSet, GameState, IllegalMove, Location, Move, NUM_PLAYERS};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::{
    ActionValidity, AecEnv, AgentId, AgentRecord, AgentStatus, EnvConfig, EnvError, Observation,
};

/// The two-player game exposed turn by turn, one agent per player.
///
/// Agents act in the order `player_0`, `player_1`. Rewards are only settled
/// once both have acted in a round: the agent that acts last in the cycle
/// triggers the settlement, and until then every pending reward reads 0.
///
/// ```
/// use collect_coins::Move;
/// use collect_coins_env::{AecEnv, AgentId, CollectCoinsEnv, EnvConfig};
///
/// let mut env = CollectCoinsEnv::new(EnvConfig::default());
/// env.reset(Some(7));
/// env.step(Move::from((0, 1))).unwrap();
/// env.step(Move::from((7, 6))).unwrap();
/// assert_eq!(env.agent_selection(), AgentId::PLAYER_0);
/// assert_eq!(env.last().reward, 0.01);
/// ```
pub struct CollectCoinsEnv {
    config: EnvConfig,
    game: GameState,
    records: [AgentRecord; NUM_PLAYERS],
    observations: [Observation; NUM_PLAYERS],
    last_moves: [Option<Move>; NUM_PLAYERS],
    /// Index into `AgentId::ALL` of the agent that acts next.
    selection: usize,
    /// Index of the agent that acts first in every round.
    round_start: usize,
    /// The number of settled rounds that did not end the game.
    num_rounds: u32,
    /// The coins of each player at the previous settlement.
    previous_coins: [u32; NUM_PLAYERS],
    rng: StdRng,
}

impl CollectCoinsEnv {
    /// Creates the environment, ready to be stepped.
    pub fn new(config: EnvConfig) -> Self {
        let game = GameState::new(config.pieces);
        let observations = [0, 1].map(|idx| Observation::new(&game, idx, config.with_mask));
        let mut env = Self {
            config,
            game: game.clone(),
            records: Default::default(),
            observations,
            last_moves: [None; NUM_PLAYERS],
            selection: 0,
            round_start: 0,
            num_rounds: 0,
            previous_coins: [0; NUM_PLAYERS],
            rng: StdRng::from_entropy(),
        };
        env.reset_to(game);
        env
    }

    /// Starts a new episode from the given position instead of the initial
    /// one. The player whose turn it is in `game` acts first, and opens every
    /// round of this episode.
    pub fn reset_to(&mut self, game: GameState) {
        self.selection = game.turn();
        self.round_start = game.turn();
        self.previous_coins = game.coins();
        self.game = game;
        self.records = Default::default();
        self.last_moves = [None; NUM_PLAYERS];
        self.num_rounds = 0;
        self.refresh_observations();
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// The number of settled rounds that did not end the game.
    pub fn num_rounds(&self) -> u32 {
        self.num_rounds
    }

    /// The move most recently applied for `agent` in this episode.
    pub fn last_move(&self, agent: AgentId) -> Option<Move> {
        self.last_moves[agent.index()]
    }

    /// The current location of the agent's piece.
    pub fn location(&self, agent: AgentId) -> Location {
        self.game.player(agent.index()).location
    }

    /// The destinations `agent` could move to right now.
    pub fn legal_moves(&self, agent: AgentId) -> CellSet {
        self.game.legal_moves(agent.index())
    }

    fn is_last_in_cycle(&self) -> bool {
        (self.selection + 1) % NUM_PLAYERS == self.round_start
    }

    fn refresh_observations(&mut self) {
        for idx in 0..NUM_PLAYERS {
            self.observations[idx] = Observation::new(&self.game, idx, self.config.with_mask);
        }
    }

    fn clear_rewards(&mut self) {
        for record in &mut self.records {
            record.reward = 0.0;
        }
    }

    fn accumulate_rewards(&mut self) {
        for record in &mut self.records {
            record.cumulative_reward += record.reward;
        }
    }

    fn round_reward(&mut self, idx: usize, done: bool) -> f32 {
        let coins = self.game.coins();
        let gained = coins[idx] - self.previous_coins[idx];
        self.previous_coins[idx] = coins[idx];
        if done {
            match coins[idx].cmp(&coins[1 - idx]) {
                Ordering::Greater => self.config.terminal_reward,
                Ordering::Equal => 0.0,
                Ordering::Less => -self.config.terminal_reward,
            }
        } else {
            gained as f32 * self.config.shaping_scale
        }
    }

    fn settle_round(&mut self) {
        let done = self.game.is_done();
        for idx in 0..NUM_PLAYERS {
            self.records[idx].reward = self.round_reward(idx, done);
        }
        if done {
            debug!(coins = ?self.game.coins(), "Game over");
            for record in &mut self.records {
                record.finish(AgentStatus::Terminated);
            }
        } else {
            self.num_rounds += 1;
            debug!(
                round = self.num_rounds,
                rewards = ?self.records.iter().map(|r| r.reward).collect::<Vec<_>>(),
                "Settled round"
            );
            if self.config.max_rounds.is_some_and(|max| self.num_rounds > max) {
                debug!(rounds = self.num_rounds, "Episode truncated");
                for record in &mut self.records {
                    record.finish(AgentStatus::Truncated);
                }
            }
        }
    }

    /// Steps an agent that is already finished. The action is ignored, and
    /// the next unfinished agent is selected, or just the next agent if all
    /// of them are finished.
    fn dead_step(&mut self, agent: AgentId, action: Move) {
        trace!(%agent, %action, "Ignoring action of finished agent");
        self.records[agent.index()].cumulative_reward = 0.0;
        self.clear_rewards();
        let next_in_cycle = (self.selection + 1) % NUM_PLAYERS;
        self.selection = (1..=NUM_PLAYERS)
            .map(|k| (self.selection + k) % NUM_PLAYERS)
            .find(|&idx| !self.records[idx].status.is_finished())
            .unwrap_or(next_in_cycle);
    }
}

impl AecEnv for CollectCoinsEnv {
    type Action = Move;
    type Observation = Observation;

    fn reset(&mut self, seed: Option<u64>) {
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.reset_to(GameState::new(self.config.pieces));
    }

    fn step(&mut self, action: Move) -> Result<(), EnvError> {
        let agent = self.agent_selection();
        let idx = agent.index();
        if self.records[idx].status.is_finished() {
            self.dead_step(agent, action);
            return Ok(());
        }
        if action == Move::Pass && self.game.has_legal_move(idx) {
            return Err(EnvError::IllegalMove {
                agent,
                err: IllegalMove::PassedWithLegalMoves,
            });
        }
        self.game
            .make_move(idx, action)
            .map_err(|err| EnvError::IllegalMove { agent, err })?;
        trace!(%agent, %action, "Applied move");

        // Whatever had accrued for this agent was handed out before it acted
        self.records[idx].cumulative_reward = 0.0;
        self.last_moves[idx] = Some(action);

        if self.is_last_in_cycle() {
            self.settle_round();
        } else {
            self.clear_rewards();
        }
        self.refresh_observations();
        self.selection = (self.selection + 1) % NUM_PLAYERS;
        self.accumulate_rewards();
        Ok(())
    }

    fn agent_selection(&self) -> AgentId {
        AgentId::ALL[self.selection]
    }

    fn observe(&self, agent: AgentId) -> Observation {
        self.observations[agent.index()]
    }

    fn record(&self, agent: AgentId) -> &AgentRecord {
        &self.records[agent.index()]
    }

    fn render(&self) -> String {
        visualize_game(&self.game)
    }
}

impl ActionValidity for CollectCoinsEnv {
    /// Any action is fine for an agent whose episode is over, since it will
    /// be ignored. A pass is only valid when there is no legal move.
    fn check_action_valid(&self, action: Move, agent: AgentId) -> bool {
        let idx = agent.index();
        if self.records[idx].status.is_finished() {
            return true;
        }
        match action {
            Move::Pass => !self.game.has_legal_move(idx),
            Move::To(to) => self.game.valid_move(idx, to),
        }
    }

    /// A uniformly random legal move, or a pass if there is none.
    fn provide_alternative_valid_action(&mut self, _action: Move, agent: AgentId) -> Move {
        let idx = agent.index();
        if self.records[idx].status.is_finished() {
            return Move::Pass;
        }
        let candidates = Vec::from_iter(self.game.legal_moves(idx));
        candidates
            .choose(&mut self.rng)
            .map_or(Move::Pass, |&to| Move::To(to))
    }
}

#[cfg(test)]
mod tests {
    use collect_coins::Piece;
    use quickcheck::quickcheck;

    use super::*;

    fn env_with(config: EnvConfig) -> CollectCoinsEnv {
        let mut env = CollectCoinsEnv::new(config);
        env.reset(Some(0));
        env
    }

    /// Player 0 (a rock) is next to the last coin at (0, 1).
    fn one_coin_left(config: EnvConfig) -> CollectCoinsEnv {
        let mut env = env_with(config);
        env.reset_to(GameState::from_position(
            [Piece::Rock, Piece::Rock],
            [Location::new(0, 0), Location::new(7, 7)],
            CellSet::new().insert(Location::new(0, 1)),
            0,
        ));
        env
    }

    quickcheck! {
        fn rewards_only_appear_at_settlement(choices: Vec<u8>, knight: bool) -> bool {
            let pieces = if knight {
                [Piece::Knight, Piece::Rock]
            } else {
                [Piece::Rock, Piece::Rock]
            };
            let mut env = env_with(EnvConfig::with_pieces(pieces));
            for choice in choices {
                if env.is_episode_over() {
                    break;
                }
                let agent = env.agent_selection();
                let legal = Vec::from_iter(env.legal_moves(agent));
                let action = if legal.is_empty() {
                    Move::Pass
                } else {
                    Move::To(legal[choice as usize % legal.len()])
                };
                env.step(action).unwrap();

                let settled = agent == AgentId::PLAYER_1;
                let any_reward = AgentId::ALL
                    .iter()
                    .any(|&other| env.record(other).reward != 0.0);
                if any_reward && !settled {
                    return false;
                }
                if env.location(AgentId::PLAYER_0) == env.location(AgentId::PLAYER_1) {
                    return false;
                }
                if env.observe(agent.other()).other_player != env.location(agent) {
                    return false;
                }
            }
            true
        }
    }

    #[test]
    fn reset_state() {
        let env = env_with(EnvConfig::default());
        assert_eq!(env.agent_selection(), AgentId::PLAYER_0);
        for agent in AgentId::ALL {
            assert_eq!(env.record(agent), &AgentRecord::default());
            assert_eq!(env.last_move(agent), None);
        }
        assert_eq!(env.num_rounds(), 0);
        let obs = env.observe(AgentId::PLAYER_1);
        assert_eq!(obs.player, Location::new(7, 7));
        assert_eq!(obs.other_player, Location::new(0, 0));
        assert_eq!(obs.board.len(), 62);
        assert!(!env.is_episode_over());
    }

    #[test]
    fn rewards_are_settled_after_the_last_agent() {
        let mut env = env_with(EnvConfig::default());
        env.step(Move::from((0, 1))).unwrap();
        // Half a round: nothing is settled yet
        assert_eq!(env.record(AgentId::PLAYER_0).reward, 0.0);
        assert_eq!(env.record(AgentId::PLAYER_1).reward, 0.0);
        assert_eq!(env.last().reward, 0.0);

        env.step(Move::from((7, 6))).unwrap();
        for agent in AgentId::ALL {
            assert_eq!(env.record(agent).reward, 0.01);
            assert_eq!(env.record(agent).cumulative_reward, 0.01);
        }
        assert_eq!(env.num_rounds(), 1);
        assert_eq!(env.agent_selection(), AgentId::PLAYER_0);

        // Moving back onto an empty cell earns nothing, and player 1 keeps
        // what it has not consumed yet
        env.step(Move::from((0, 0))).unwrap();
        assert_eq!(env.record(AgentId::PLAYER_0).cumulative_reward, 0.0);
        assert_eq!(env.record(AgentId::PLAYER_1).cumulative_reward, 0.01);
        env.step(Move::from((6, 6))).unwrap();
        assert_eq!(env.record(AgentId::PLAYER_0).reward, 0.0);
        assert_eq!(env.record(AgentId::PLAYER_1).reward, 0.01);
        assert_eq!(env.record(AgentId::PLAYER_1).cumulative_reward, 0.01);
        assert_eq!(env.last_move(AgentId::PLAYER_1), Some(Move::from((6, 6))));
    }

    #[test]
    fn illegal_moves_are_refused() {
        let mut env = env_with(EnvConfig::default());
        let err = env.step(Move::from((1, 1))).unwrap_err();
        assert!(matches!(
            err,
            EnvError::IllegalMove {
                agent: AgentId::PLAYER_0,
                err: IllegalMove::UnreachableForPiece { .. }
            }
        ));
        let err = env.step(Move::Pass).unwrap_err();
        assert!(matches!(
            err,
            EnvError::IllegalMove {
                err: IllegalMove::PassedWithLegalMoves,
                ..
            }
        ));
        assert_eq!(env.agent_selection(), AgentId::PLAYER_0);
        assert_eq!(env.game().board().coins_left(), 62);
    }

    #[test]
    fn terminal_rewards() {
        let mut env = one_coin_left(EnvConfig::default());
        env.step(Move::from((0, 1))).unwrap();
        assert!(env.game().is_done());
        // The round is not over yet, so nobody is terminated
        assert!(!env.record(AgentId::PLAYER_1).status.is_finished());

        env.step(Move::from((7, 6))).unwrap();
        assert!(env.is_episode_over());
        assert_eq!(env.record(AgentId::PLAYER_0).reward, 1.0);
        assert_eq!(env.record(AgentId::PLAYER_1).reward, -1.0);

        let last = env.last();
        assert_eq!(env.agent_selection(), AgentId::PLAYER_0);
        assert!(last.terminated);
        assert!(!last.truncated);
        assert_eq!(last.reward, 1.0);
    }

    #[test]
    fn dead_steps_cycle_through_finished_agents() {
        let mut env = one_coin_left(EnvConfig::default());
        env.step(Move::from((0, 1))).unwrap();
        env.step(Move::from((7, 6))).unwrap();
        let board_before = *env.game().board();

        // Any action is ignored now
        env.step(Move::from((5, 5))).unwrap();
        assert_eq!(env.agent_selection(), AgentId::PLAYER_1);
        assert_eq!(env.record(AgentId::PLAYER_0).cumulative_reward, 0.0);
        let last = env.last();
        assert!(last.terminated);
        assert_eq!(last.reward, -1.0);

        env.step(Move::Pass).unwrap();
        assert_eq!(env.agent_selection(), AgentId::PLAYER_0);
        assert_eq!(env.record(AgentId::PLAYER_1).cumulative_reward, 0.0);
        assert_eq!(*env.game().board(), board_before);
        assert!(env.record(AgentId::PLAYER_0).status.is_terminated());
    }

    #[test]
    fn rounds_opened_by_player_1_settle_after_player_0() {
        let mut env = env_with(EnvConfig::default());
        env.reset_to(GameState::from_position(
            [Piece::Rock, Piece::Rock],
            [Location::new(0, 0), Location::new(7, 7)],
            CellSet::from_iter([Location::new(7, 6), Location::new(0, 1), Location::new(4, 4)]),
            1,
        ));
        assert_eq!(env.agent_selection(), AgentId::PLAYER_1);

        env.step(Move::from((7, 6))).unwrap();
        assert_eq!(env.num_rounds(), 0);
        for agent in AgentId::ALL {
            assert_eq!(env.record(agent).reward, 0.0);
        }

        env.step(Move::from((0, 1))).unwrap();
        assert_eq!(env.num_rounds(), 1);
        assert_eq!(env.agent_selection(), AgentId::PLAYER_1);
        for agent in AgentId::ALL {
            assert_eq!(env.record(agent).reward, 0.01);
        }
        assert_eq!(env.last().reward, 0.01);
    }

    #[test]
    fn draw_gives_zero() {
        let mut env = env_with(EnvConfig::default());
        env.reset_to(GameState::from_position(
            [Piece::Rock, Piece::Knight],
            [Location::new(0, 0), Location::new(7, 7)],
            CellSet::from_iter([Location::new(0, 1), Location::new(5, 6)]),
            0,
        ));
        env.step(Move::from((0, 1))).unwrap();
        env.step(Move::from((5, 6))).unwrap();
        for agent in AgentId::ALL {
            assert!(env.record(agent).status.is_terminated());
            assert_eq!(env.record(agent).reward, 0.0);
        }
    }

    #[test]
    fn single_agent_reward_scale() {
        let mut env = one_coin_left(EnvConfig::single_agent([Piece::Rock, Piece::Rock]));
        env.step(Move::from((0, 1))).unwrap();
        env.step(Move::from((7, 6))).unwrap();
        assert_eq!(env.record(AgentId::PLAYER_0).reward, 100.0);
        assert_eq!(env.record(AgentId::PLAYER_1).reward, -100.0);
    }

    #[test]
    fn truncation_after_max_rounds() {
        let config = EnvConfig {
            max_rounds: Some(2),
            ..EnvConfig::default()
        };
        let mut env = env_with(config);
        let moves = [((0, 1), (7, 6)), ((0, 0), (7, 7)), ((0, 1), (7, 6))];
        for (round, (move_0, move_1)) in moves.into_iter().enumerate() {
            assert!(!env.is_episode_over(), "round {}", round);
            env.step(Move::from(move_0)).unwrap();
            env.step(Move::from(move_1)).unwrap();
        }
        assert_eq!(env.num_rounds(), 3);
        assert!(env.is_episode_over());
        for agent in AgentId::ALL {
            assert!(env.record(agent).status.is_truncated());
        }
    }

    #[test]
    fn no_truncation_without_limit() {
        let config = EnvConfig {
            max_rounds: None,
            ..EnvConfig::default()
        };
        let mut env = env_with(config);
        for _ in 0..250 {
            env.step(Move::from((0, 1))).unwrap();
            env.step(Move::from((7, 6))).unwrap();
            env.step(Move::from((0, 0))).unwrap();
            env.step(Move::from((7, 7))).unwrap();
        }
        assert_eq!(env.num_rounds(), 500);
        assert!(!env.is_episode_over());
    }

    #[test]
    fn observations_follow_every_move() {
        let config = EnvConfig {
            with_mask: true,
            ..EnvConfig::with_pieces([Piece::Rock, Piece::Knight])
        };
        let mut env = env_with(config);
        assert_eq!(
            env.observe(AgentId::PLAYER_0).mask,
            Some(env.legal_moves(AgentId::PLAYER_0))
        );
        env.step(Move::from((1, 0))).unwrap();
        let obs = env.observe(AgentId::PLAYER_1);
        assert_eq!(obs.other_player, Location::new(1, 0));
        assert_eq!(obs.mask, Some(env.legal_moves(AgentId::PLAYER_1)));
        assert_eq!(obs.mask.unwrap().len(), 2);
    }

    #[test]
    fn validity_helpers() {
        let mut env = env_with(EnvConfig::default());
        let agent = AgentId::PLAYER_0;
        assert!(env.check_action_valid(Move::from((0, 1)), agent));
        assert!(!env.check_action_valid(Move::from((0, 2)), agent));
        assert!(!env.check_action_valid(Move::from((-1, 0)), agent));
        assert!(!env.check_action_valid(Move::Pass, agent));
        for _ in 0..20 {
            let alternative = env.provide_alternative_valid_action(Move::from((0, 2)), agent);
            assert!(env.check_action_valid(alternative, agent));
        }
    }

    #[test]
    fn finished_agents_accept_anything() {
        let mut env = one_coin_left(EnvConfig::default());
        env.step(Move::from((0, 1))).unwrap();
        env.step(Move::from((7, 6))).unwrap();
        let agent = env.agent_selection();
        assert!(env.check_action_valid(Move::from((3, 3)), agent));
        assert_eq!(
            env.provide_alternative_valid_action(Move::from((3, 3)), agent),
            Move::Pass
        );
    }

    #[test]
    fn seeded_alternatives_are_reproducible() {
        let alternatives = |seed| {
            let config = EnvConfig::with_pieces([Piece::Knight, Piece::Knight]);
            let mut env = CollectCoinsEnv::new(config);
            env.reset(Some(seed));
            (0..10)
                .map(|_| env.provide_alternative_valid_action(Move::Pass, AgentId::PLAYER_0))
                .collect::<Vec<_>>()
        };
        assert_eq!(alternatives(42), alternatives(42));
    }

    #[test]
    fn render_shows_the_board() {
        let mut env = env_with(EnvConfig::default());
        env.step(Move::from((0, 1))).unwrap();
        let text = env.render();
        assert!(text.contains("wR"));
        assert!(text.contains("bR"));
        assert!(text.ends_with("1/0"));
    }
}
