//! Game configuration
//!
//! Read from an optional JSON blob supplied by the host page. Missing fields
//! fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SnekError, SnekResult};
use crate::sim::Grid;

/// Board size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoardPreset {
    Small,
    #[default]
    Normal,
    Large,
}

impl BoardPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardPreset::Small => "Small",
            BoardPreset::Normal => "Normal",
            BoardPreset::Large => "Large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(BoardPreset::Small),
            "normal" | "medium" => Some(BoardPreset::Normal),
            "large" => Some(BoardPreset::Large),
            _ => None,
        }
    }

    /// Number of cells (always a perfect square)
    pub fn board_size(&self) -> usize {
        match self {
            BoardPreset::Small => 24 * 24,
            BoardPreset::Normal => 42 * 42,
            BoardPreset::Large => 60 * 60,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Total number of cells; must have an integer square root
    pub board_size: usize,
    /// Milliseconds between ticks
    pub tick_interval_ms: u32,
    /// Segments in a freshly created snake
    pub starting_length: usize,
    /// Random draws before food placement scans for a free cell
    pub max_food_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            starting_length: STARTING_SNAKE_LENGTH,
            max_food_attempts: MAX_FOOD_ATTEMPTS,
        }
    }
}

impl GameConfig {
    pub fn from_preset(preset: BoardPreset) -> Self {
        Self {
            board_size: preset.board_size(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> SnekResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field and return the grid the board size describes
    pub fn validate(&self) -> SnekResult<Grid> {
        let grid = Grid::new(self.board_size)?;
        if self.starting_length == 0 {
            return Err(SnekError::InvalidConfiguration(
                "starting length must be at least 1",
            ));
        }
        if self.starting_length > grid.rows() as usize {
            return Err(SnekError::InvalidConfiguration(
                "starting snake does not fit on the board",
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(SnekError::InvalidConfiguration(
                "tick interval must be positive",
            ));
        }
        Ok(grid)
    }
}
