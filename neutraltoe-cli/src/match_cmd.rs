//! Match command - AI-vs-AI games with aggregated statistics
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: seeding and formatting utilities

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use neutraltoe_core::{self_play, EngineConfig, MinimaxAI, Side};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Search depth override (defaults to the config's depth)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Plies before a game is called a draw
    #[arg(long, default_value = "60")]
    pub max_plies: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    winner: Option<Side>,
    plies: usize,
    seed: u64,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
pub fn run(args: MatchArgs, config: &EngineConfig) -> Result<()> {
    let mut config = config.clone();
    if let Some(depth) = args.depth {
        config.depth = depth;
        config.validate()?;
    }

    tracing::info!(
        "Starting match: {} games, depth={}, max plies={}",
        args.games,
        config.depth,
        args.max_plies
    );

    let results = play_match(&config, &args)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in parallel, one pair of engines per game
fn play_match(config: &EngineConfig, args: &MatchArgs) -> Result<MatchResults> {
    let base_seed = create_rng(config.seed).gen::<u64>();

    let progress = ProgressBar::new(args.games as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let games = (0..args.games)
        .into_par_iter()
        .map(|game_num| {
            let record = play_single_game(config, game_num + 1, game_seed(base_seed, game_num), args);
            progress.inc(1);
            record
        })
        .collect::<Result<Vec<_>>>()?;

    progress.finish_and_clear();

    for record in &games {
        tracing::info!(
            "Game {}: {:?} ({} plies, seed {})",
            record.game_number,
            record.winner,
            record.plies,
            record.seed
        );
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game; X and O get distinct seeds derived from the game seed
fn play_single_game(
    config: &EngineConfig,
    game_number: usize,
    seed: u64,
    args: &MatchArgs,
) -> Result<GameRecord> {
    let mut x_ai = MinimaxAI::from_config(&config.clone().with_seed(seed), Side::X);
    let mut o_ai = MinimaxAI::from_config(&config.clone().with_seed(seed ^ 1), Side::O);

    let outcome = self_play(&mut x_ai, &mut o_ai, args.max_plies)?;
    if outcome.is_draw() {
        tracing::debug!(game_number, plies = outcome.plies, "game drawn");
    }

    Ok(GameRecord {
        game_number,
        winner: outcome.winner,
        plies: outcome.plies,
        seed,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let x_wins = games.iter().filter(|g| g.winner == Some(Side::X)).count();
    let o_wins = games.iter().filter(|g| g.winner == Some(Side::O)).count();
    let draws = games.iter().filter(|g| g.winner.is_none()).count();

    let total_plies: usize = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    MatchResults {
        games,
        x_wins,
        o_wins,
        draws,
        avg_plies,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Per-game seed, stable for a given base seed
fn game_seed(base: u64, game_num: usize) -> u64 {
    base.wrapping_add((game_num as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: Option<Side>,
        plies: usize,
        seed: u64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        x_wins: usize,
        o_wins: usize,
        draws: usize,
        avg_plies: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        x_wins: results.x_wins,
        o_wins: results.o_wins,
        draws: results.draws,
        avg_plies: results.avg_plies,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: g.winner,
                plies: g.plies,
                seed: g.seed,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!("X wins:      {} ({:.1}%)", results.x_wins, percent(results.x_wins, total));
    println!("O wins:      {} ({:.1}%)", results.o_wins, percent(results.o_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg plies:   {:.1}", results.avg_plies);

    println!("\nGame details:");
    for game in &results.games {
        let result = match game.winner {
            Some(side) => format!("{} wins", side),
            None => "draw".to_string(),
        };
        println!("  Game {}: {} in {} plies", game.game_number, result, game.plies);
    }
}

// ============================================================================
// TESTS
// ============================================================================
