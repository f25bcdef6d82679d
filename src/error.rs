//! Error types for setup and growth failures
//!
//! Rejected moves and collisions are tick outcomes, not errors.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type SnekResult<T> = Result<T, SnekError>;

#[derive(Debug, Error)]
pub enum SnekError {
    /// Board size must be a non-zero perfect square.
    #[error("invalid configuration: board size {board_size} has no integer square root")]
    InvalidBoardSize { board_size: usize },

    /// Any other invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Every cell around the tail is taken or off the board.
    #[error("no free cell next to the tail to grow into")]
    NoRoomToGrow,
}
