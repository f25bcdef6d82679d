//! Collision and food detection for the snake's head
//!
//! The tricky part is the side walls. Stepping off the left edge of row N
//! produces the same linear index as the last cell of row N-1, so horizontal
//! exits are caught with the border tag the head carried before the move.
//! Vertical exits fall outside the index range and need no tag.

use glam::IVec2;

use super::chain::SegmentChain;
use super::direction::Direction;
use super::grid::{BorderKind, Grid};

/// True if the head shares a cell with any other segment
pub fn body_collision(chain: &SegmentChain, grid: &Grid) -> bool {
    let mut segments = chain.iter();
    let Some(head) = segments.next() else {
        return false;
    };
    let head_idx = grid.to_index(head.pos.x, head.pos.y);
    segments.any(|s| grid.to_index(s.pos.x, s.pos.y) == head_idx)
}

/// True if the head has left the board
///
/// `edge_before_move` is the head's border tag from the previous tick and
/// `direction` the step that was just taken.
pub fn boundary_collision(
    grid: &Grid,
    head: IVec2,
    edge_before_move: BorderKind,
    direction: Direction,
) -> bool {
    let vertical_exit = grid.index_in_range(head).is_none();
    let horizontal_exit = matches!(
        (edge_before_move, direction),
        (BorderKind::Left, Direction::Left) | (BorderKind::Right, Direction::Right)
    );
    vertical_exit || horizontal_exit
}

/// True if the head sits on the food cell
pub fn food_eaten(grid: &Grid, head: IVec2, food: Option<usize>) -> bool {
    match (food, grid.index_of(head)) {
        (Some(food), Some(idx)) => food == idx,
        _ => false,
    }
}

/// Border tag to carry into the next tick
pub fn edge_flag(grid: &Grid, head: IVec2) -> BorderKind {
    if grid.contains(head) {
        grid.classify(head.x, head.y)
    } else {
        BorderKind::None
    }
}
