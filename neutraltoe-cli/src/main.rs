//! NEUTRALTOE CLI - Command-line interface
//!
//! Commands:
//! - play: Interactive game in the terminal, optionally against the AI
//! - suggest: Ask the AI for a move on a given board
//! - match: Play AI-vs-AI games and report statistics

mod match_cmd;
mod play;
mod suggest;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use neutraltoe_core::EngineConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "neutraltoe")]
#[command(about = "Tic-tac-toe where playing on an opposing mark clears it")]
struct Cli {
    /// Random seed for reproducible AI play
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Engine config JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play(play::PlayArgs),
    /// Suggest a move for a position
    Suggest(suggest::SuggestArgs),
    /// Play AI-vs-AI games
    Match(match_cmd::MatchArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::Play(args) => play::run(args, &config),
        Commands::Suggest(args) => suggest::run(args, &config),
        Commands::Match(args) => match_cmd::run(args, &config),
    }
}

/// Config file if given, defaults otherwise; `--seed` wins over the file
fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if seed.is_some() {
        config.seed = seed;
    }

    tracing::debug!(?config, "engine config");
    Ok(config)
}
