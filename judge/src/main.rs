use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use collect_coins::Piece;
use collect_coins_env::EnvConfig;
use itertools::Itertools;
use judge::{play_game, GameResult, PolicyKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// The policies taking part in the tournament
    #[clap(num_args(2..), value_delimiter = ' ')]
    policies: Vec<PolicyKind>,

    /// How many games to play per matchup
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Path to an environment config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The pieces of player 0 and player 1, "rock" or "knight"
    #[arg(long, num_args = 2)]
    pieces: Option<Vec<Piece>>,

    /// Truncate games after this many rounds
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Never truncate games
    #[arg(long, default_value_t = false, conflicts_with = "max_rounds")]
    no_truncation: bool,

    /// Include the legal move mask in observations
    #[arg(long, default_value_t = false)]
    with_mask: bool,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

impl Args {
    fn env_config(&self) -> anyhow::Result<EnvConfig> {
        let mut config = match &self.config {
            Some(path) => EnvConfig::load(path)?,
            None => EnvConfig::default(),
        };
        if let Some(pieces) = &self.pieces {
            config.pieces = [pieces[0], pieces[1]];
        }
        if self.max_rounds.is_some() {
            config.max_rounds = self.max_rounds;
        }
        if self.no_truncation {
            config.max_rounds = None;
        }
        config.with_mask |= self.with_mask;
        Ok(config)
    }
}

#[derive(Default)]
struct MatchScore {
    wins: [usize; 2],
    ties: usize,
    truncated: usize,
    substitutions: usize,
}

impl MatchScore {
    fn num_games(&self) -> usize {
        self.wins[0] + self.wins[1] + self.ties + self.truncated
    }
}

fn play_matchup(
    policies: [PolicyKind; 2],
    num_games: usize,
    rng: &mut StdRng,
    config: &EnvConfig,
) -> anyhow::Result<MatchScore> {
    let mut match_score = MatchScore::default();

    for game_idx in 0..num_games {
        let record = play_game(rng, policies, config)?;
        match record.result {
            GameResult::WonByPlayer { player_idx } => {
                debug!(winner = %policies[player_idx], game_idx);
                match_score.wins[player_idx] += 1;
            }
            GameResult::Tie => {
                debug!(game_idx, "Tie");
                match_score.ties += 1;
            }
            GameResult::Truncated => {
                debug!(game_idx, rounds = record.rounds, "Truncated");
                match_score.truncated += 1;
            }
        }
        match_score.substitutions += record.substitutions;
    }

    eprintln!(
        "End result:\n- {} wins by {}\n- {} wins by {}\n- {} ties\n- {} truncated\n\
         - {} illegal actions replaced",
        match_score.wins[0],
        policies[0],
        match_score.wins[1],
        policies[1],
        match_score.ties,
        match_score.truncated,
        match_score.substitutions,
    );

    Ok(match_score)
}

// prints an upper triangular matrix of the results of the tournament
fn print_tournament_results(
    policies: &[PolicyKind],
    match_results: &HashMap<(usize, usize), MatchScore>,
) {
    println!("\nTournament results (p0 win %, p1 win %, tie %):\n");
    print!(" {:19} |", "p0 ↓           p1 →");
    for j in (0..policies.len()).rev() {
        print!(" {:19} |", policies[j].to_string());
    }
    println!();
    for i in 0..policies.len() {
        for _ in 0..policies.len() - i + 1 {
            print!("---------------------|");
        }
        println!();
        print!(" {:19} |", policies[i].to_string());
        for j in (0..policies.len()).rev() {
            if i >= j {
                print!("    ");
            } else if let Some(score) = match_results.get(&(i, j)) {
                let num_games = score.num_games().max(1) as f32;
                print!(
                    "{:5.1}% {:5.1}% {:5.1}% |",
                    score.wins[0] as f32 / num_games * 100.0,
                    score.wins[1] as f32 / num_games * 100.0,
                    score.ties as f32 / num_games * 100.0
                );
            } else {
                print!(" {:19} |", "N/A");
            }
        }
        println!();
    }
    println!("---------------------|");
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let config = args.env_config()?;
    debug!(config = %serde_json::to_string(&config)?, "Environment");

    let matchups: Vec<(usize, usize)> = (0..args.policies.len()).tuple_combinations().collect();

    let mut match_results: HashMap<(usize, usize), MatchScore> = HashMap::new();
    for (i0, i1) in matchups {
        let policies = [args.policies[i0], args.policies[i1]];
        info!(player_0 = %policies[0], player_1 = %policies[1], "Matchup");
        let match_score = play_matchup(policies, args.num_games, &mut rng, &config)?;
        match_results.insert((i0, i1), match_score);
    }

    if args.policies.len() > 2 {
        print_tournament_results(&args.policies, &match_results);
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
