//! Error types for the rule and search engines

use std::fmt;
use thiserror::Error;

/// Why a move was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    /// Position is not in 0..=8
    OutOfRange,
    /// Position equals the most recently played cell
    LastMoveLocked,
    /// Side already owns the cell
    OwnMark,
    /// Cell was never initialized
    Unset,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Violation::OutOfRange => "position must be 0-8",
            Violation::LastMoveLocked => "cell was just played",
            Violation::OwnMark => "cell already holds your mark",
            Violation::Unset => "cell is not initialized",
        };
        f.write_str(text)
    }
}

/// Recoverable engine errors surfaced to the driving collaborator
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("illegal move at position {position}: {violation}")]
    IllegalMove { position: usize, violation: Violation },

    #[error("game already decided")]
    GameAlreadyDecided,

    #[error("no legal move available")]
    NoLegalMoveAvailable,
}

impl EngineError {
    pub fn illegal(position: usize, violation: Violation) -> Self {
        EngineError::IllegalMove { position, violation }
    }
}

/// Errors from loading or validating an engine config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}
