//! Engine configuration, loadable from JSON

use crate::ai::{POOL_SIZE, RETAIN_RATIO, SEARCH_DEPTH};
use crate::board::{Side, BOARD_SIZE};
use crate::error::ConfigError;
use crate::eval::Heuristics;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the computer player
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Search depth in plies
    pub depth: u32,
    /// Side the computer plays
    pub robot_side: Side,
    /// Share of the best candidate's score a move needs to stay in the pool
    pub retain_ratio: f64,
    /// Number of pooled moves drawn from at random
    pub pool_size: usize,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    pub heuristics: Heuristics,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: SEARCH_DEPTH,
            robot_side: Side::O,
            retain_ratio: RETAIN_RATIO,
            pool_size: POOL_SIZE,
            seed: None,
            heuristics: Heuristics::default(),
        }
    }
}

impl EngineConfig {
    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load and validate a JSON config file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 || self.depth as usize > BOARD_SIZE {
            return Err(invalid(format!("depth {} must be 1-9", self.depth)));
        }
        if !(self.retain_ratio > 0.0 && self.retain_ratio <= 1.0) {
            return Err(invalid(format!(
                "retain_ratio {} must be in (0, 1]",
                self.retain_ratio
            )));
        }
        if self.pool_size == 0 {
            return Err(invalid("pool_size must be at least 1".to_string()));
        }
        if !self.heuristics.is_valid() {
            return Err(invalid(
                "heuristic weights must be non-negative and stay below the block score".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid { message }
}
