//! NEUTRALTOE Core - Rule engine and AI
//!
//! This crate provides the core game logic for NEUTRALTOE, tic-tac-toe where
//! playing on an opposing mark clears it:
//! - Board geometry and cell contents
//! - Legality, state transitions and win detection
//! - Static evaluation of candidate moves
//! - Minimax AI with alpha-beta pruning and varied non-decisive play
//! - Game sessions with move history

pub mod board;
pub mod error;
pub mod game;
pub mod eval;
pub mod ai;
pub mod config;
pub mod session;

// Re-exports for convenient access
pub use board::{Board, BoardParseError, Cell, Side, BOARD_SIZE, LINES};
pub use error::{ConfigError, EngineError, Violation};
pub use game::{apply_move, detect_winner, is_legal_move, GameState, MoveRecord, Transition};
pub use eval::{evaluate, Heuristics, BLOCK_SCORE, NEUTRALIZE_SCORE, WIN_SCORE};
pub use ai::{
    legal_moves_for, minimax, Candidate, MinimaxAI, MoveChoice, SearchContext, SEARCH_DEPTH,
};
pub use config::EngineConfig;
pub use session::{self_play, Game, GameOutcome, Players};
