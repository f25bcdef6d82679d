//! Rendering targets
//!
//! The simulation only knows about cells switching on and off. A renderer
//! implements `CellSink` and reflects those flips however it likes.

pub mod text;

pub use text::TextRenderer;

use crate::sim::CellChange;

/// Receives the results of a tick, in order
pub trait CellSink {
    /// A cell's food or snake flag flipped
    fn cell_changed(&mut self, change: &CellChange);

    /// The chain moved; re-read head and tail from the state if needed
    fn moved(&mut self) {}

    fn food_eaten(&mut self) {}

    fn game_over(&mut self) {}
}
