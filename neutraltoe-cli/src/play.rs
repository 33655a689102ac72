//! Play command - interactive game in the terminal
//!
//! The robot's pause before moving lives here, never in the engine.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use neutraltoe_core::session::ROBOT_NAME;
use neutraltoe_core::{EngineConfig, EngineError, Game, MinimaxAI, Players};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args, Clone)]
pub struct PlayArgs {
    /// Name of the X player
    #[arg(long, default_value = "Player X")]
    pub x_name: String,

    /// Name of the O player
    #[arg(long, default_value = "Player O")]
    pub o_name: String,

    /// Let the AI play the configured robot side (O by default)
    #[arg(long)]
    pub robot: bool,

    /// Pause before the AI moves, in milliseconds
    #[arg(long, default_value = "500")]
    pub delay_ms: u64,

    /// Show the move history after every move
    #[arg(long)]
    pub history: bool,
}

/// A line of player input
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Move(usize),
    History,
    Reset,
    Quit,
    Unknown(String),
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs, config: &EngineConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let game = run_session(&args, config, &mut input, &mut output)?;
    tracing::info!(moves = game.history().len(), "session ended");
    Ok(())
}

/// Drive one session until `q` or end of input
fn run_session<R: BufRead, W: Write>(
    args: &PlayArgs,
    config: &EngineConfig,
    input: &mut R,
    out: &mut W,
) -> Result<Game> {
    let players = Players::new(args.x_name.as_str(), args.o_name.as_str());
    let mut game = if args.robot {
        Game::with_robot(players, config.robot_side)
    } else {
        Game::new(players)
    };
    let mut ai = MinimaxAI::from_config(config, config.robot_side);
    let mut show_history = args.history;

    writeln!(out, "Cells are numbered 0-8, row by row. h = history, r = restart, q = quit.")?;
    render(out, &game, show_history)?;

    loop {
        if game.robot_to_move() && !game.is_stalemate() {
            if args.delay_ms > 0 {
                thread::sleep(Duration::from_millis(args.delay_ms));
            }
            match game.play_robot(&mut ai) {
                Ok((choice, record)) => {
                    tracing::debug!(?choice, "robot move");
                    writeln!(out, "{} plays {}", ROBOT_NAME, record.position)?;
                    render(out, &game, show_history)?;
                    continue;
                }
                Err(EngineError::NoLegalMoveAvailable) => {}
                Err(e) => return Err(e.into()),
            }
        }

        prompt(out, &game)?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match parse_command(&line) {
            Command::Quit => break,
            Command::Reset => {
                game.reset();
                render(out, &game, show_history)?;
            }
            Command::History => {
                show_history = !show_history;
                render(out, &game, show_history)?;
            }
            Command::Move(position) => match game.play(position) {
                Ok(_) => render(out, &game, show_history)?,
                Err(e) => {
                    tracing::warn!(position, error = %e, "move rejected");
                    writeln!(out, "Rejected: {}", e)?;
                }
            },
            Command::Unknown(text) => {
                writeln!(out, "Unknown input '{}'", text)?;
            }
        }
    }

    Ok(game)
}

// ============================================================================
// INPUT AND RENDERING
// ============================================================================

fn parse_command(line: &str) -> Command {
    let text = line.trim();
    match text {
        "q" | "quit" => Command::Quit,
        "r" | "reset" => Command::Reset,
        "h" | "history" => Command::History,
        _ => match text.parse::<usize>() {
            Ok(position) => Command::Move(position),
            Err(_) => Command::Unknown(text.to_string()),
        },
    }
}

fn prompt<W: Write>(out: &mut W, game: &Game) -> io::Result<()> {
    let state = game.state();
    if let Some(name) = game.winner_name() {
        writeln!(out, "{} wins! r = new game, q = quit", name)?;
    } else if game.is_stalemate() {
        writeln!(out, "No legal moves left, draw. r = new game, q = quit")?;
    } else {
        let side = state.active;
        write!(out, "{} ({}) > ", game.players().name(side), side)?;
    }
    out.flush()
}

fn render<W: Write>(out: &mut W, game: &Game, show_history: bool) -> io::Result<()> {
    writeln!(out)?;
    let board = game.state().board;
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let pos = row * 3 + col;
                let cell = board.cells()[pos];
                // Hint the cell number on empty squares
                match cell.side() {
                    Some(_) => cell.to_string(),
                    None => pos.to_string(),
                }
            })
            .collect();
        writeln!(out, " {}", cells.join(" | "))?;
    }

    if let Some(last) = game.state().last_move {
        writeln!(out, "Last move: {} (locked)", last)?;
    }

    if show_history {
        writeln!(out, "History:")?;
        for (i, record) in game.history().iter().enumerate() {
            writeln!(
                out,
                "  {}. {} ({}) at {}: {} -> {}",
                i + 1,
                game.players().name(record.side),
                record.side,
                record.position,
                record.prior,
                record.posterior
            )?;
        }
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
