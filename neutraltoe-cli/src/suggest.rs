//! Suggest command - ask the AI for a move on a given board

use anyhow::{ensure, Context, Result};
use clap::Args;
use serde::Serialize;

use neutraltoe_core::{Board, Candidate, EngineConfig, MinimaxAI, MoveChoice, Side, BOARD_SIZE};

#[derive(Args)]
pub struct SuggestArgs {
    /// Board as 9 cells, row by row: X, O and '.' for empty (e.g. "XX..O....")
    #[arg(long)]
    pub board: Board,

    /// Cell played last; locked for this move
    #[arg(long)]
    pub last: Option<usize>,

    /// Side to move
    #[arg(long, default_value = "o")]
    pub side: Side,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Suggestion {
    side: Side,
    choice: MoveChoice,
    candidates: Vec<Candidate>,
    pool: Vec<usize>,
}

pub fn run(args: SuggestArgs, config: &EngineConfig) -> Result<()> {
    let suggestion = suggest(&args, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
    } else {
        print_text(&args.board, &suggestion);
    }
    Ok(())
}

fn suggest(args: &SuggestArgs, config: &EngineConfig) -> Result<Suggestion> {
    if let Some(last) = args.last {
        ensure!(last < BOARD_SIZE, "--last must be 0-8, got {}", last);
    }

    let mut ai = MinimaxAI::from_config(config, args.side);
    let candidates = ai.candidates(&args.board, args.last);
    let pool = ai
        .top_candidates(&args.board, args.last)
        .iter()
        .map(|c| c.position)
        .collect();
    let choice = ai
        .best_move(&args.board, args.last)
        .context("No move to suggest")?;

    Ok(Suggestion {
        side: args.side,
        choice,
        candidates,
        pool,
    })
}

fn print_text(board: &Board, suggestion: &Suggestion) {
    print!("{}", board);
    println!();
    println!(
        "{} plays {} (score {}{})",
        suggestion.side,
        suggestion.choice.position,
        suggestion.choice.score,
        if suggestion.choice.decisive { ", decisive" } else { "" }
    );
    println!("\nCandidates:");
    for c in &suggestion.candidates {
        println!(
            "  {}: base {:>2}  heuristic {:>4}  combined {:>4}",
            c.position,
            c.base,
            c.heuristic,
            c.combined()
        );
    }
    if !suggestion.choice.decisive {
        println!("Pool: {:?}", suggestion.pool);
    }
}
