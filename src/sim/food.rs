//! Food placement
//!
//! Random draws first, then a scan of the free cells once the draws run out,
//! so a crowded board still terminates.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::grid::Board;

/// Pick a cell for the next food item, or `None` if the board is full
pub fn pick_food_cell<R: Rng + ?Sized>(board: &Board, rng: &mut R, max_attempts: u32) -> Option<usize> {
    let count = board.cells().len();
    if count == 0 {
        return None;
    }

    for _ in 0..max_attempts {
        let idx = rng.random_range(0..count);
        if !board.is_occupied(idx) {
            return Some(idx);
        }
    }

    let free = board.free_indices();
    let picked = free.choose(rng).copied();
    if picked.is_some() {
        log::warn!(
            "Food placement fell back to free-cell scan after {} attempts",
            max_attempts
        );
    }
    picked
}
