//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One move per tick
//! - Seeded RNG only
//! - Stable head-to-tail iteration order
//! - No rendering or platform dependencies

pub mod chain;
pub mod collision;
pub mod direction;
pub mod food;
pub mod grid;
pub mod state;
pub mod tick;

pub use chain::{MoveResult, NextHead, Segment, SegmentChain, SegmentId};
pub use collision::{body_collision, boundary_collision, edge_flag, food_eaten};
pub use direction::Direction;
pub use food::pick_food_cell;
pub use grid::{Board, BorderKind, Cell, CellChange, CellKind, Grid};
pub use state::{GamePhase, GameSnapshot, GameState};
pub use tick::{TickOutcome, TickReport, tick};
