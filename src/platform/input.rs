//! Keyboard mapping

use crate::sim::Direction;

/// Map a `KeyboardEvent.key` value to a direction
///
/// Arrow keys and WASD, letters in either case.
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => return Some(Direction::Up),
        "ArrowDown" => return Some(Direction::Down),
        "ArrowLeft" => return Some(Direction::Left),
        "ArrowRight" => return Some(Direction::Right),
        _ => {}
    }
    match key.to_ascii_lowercase().as_str() {
        "w" => Some(Direction::Up),
        "s" => Some(Direction::Down),
        "a" => Some(Direction::Left),
        "d" => Some(Direction::Right),
        _ => None,
    }
}
