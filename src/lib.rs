//! Snek - grid Snake for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (segment chain, movement, collisions, food)
//! - `renderer`: Cell-activation interface and a text renderer
//! - `platform`: Tick clock and keyboard mapping for hosts
//! - `config`: Board and timing configuration

pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{BoardPreset, GameConfig};
pub use error::{SnekError, SnekResult};

/// Game configuration constants
pub mod consts {
    /// Default board (42 × 42)
    pub const DEFAULT_BOARD_SIZE: usize = 1764;
    /// Default time between ticks
    pub const DEFAULT_TICK_INTERVAL_MS: u32 = 150;
    pub const STARTING_SNAKE_LENGTH: usize = 4;
    /// Random food draws before falling back to a free-cell scan
    pub const MAX_FOOD_ATTEMPTS: u32 = 64;
}
