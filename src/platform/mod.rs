//! Platform abstraction layer
//!
//! Host-side helpers that do not depend on the browser APIs themselves:
//! - Tick timing
//! - Keyboard input mapping

pub mod clock;
pub mod input;

pub use clock::TickClock;
pub use input::direction_for_key;
