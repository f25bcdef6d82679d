//! One simulation step
//!
//! Order inside a tick: move, collision checks, light the new head, growth,
//! vacate the old tail, then food relocation. A fatal collision returns
//! before any side effect, so eating on the tick you die does not save you.

use serde::{Deserialize, Serialize};

use super::chain::MoveResult;
use super::collision::{body_collision, boundary_collision, edge_flag, food_eaten};
use super::grid::{CellChange, CellKind};
use super::state::{GamePhase, GameState};
use crate::renderer::CellSink;

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    Moved,
    /// Moved onto the food, grew, and the food was relocated
    AteFood,
    /// The pending direction would reverse into the neck; nothing changed
    Rejected,
    /// Hit a wall or the body; the run is over
    GameOver,
    /// Ticked after game over; nothing changed
    Halted,
}

impl TickOutcome {
    /// True if the chain moved this tick
    pub fn moved(&self) -> bool {
        matches!(self, TickOutcome::Moved | TickOutcome::AteFood)
    }
}

/// Outcome of a tick plus the cells it flipped, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub cells: Vec<CellChange>,
}

impl TickReport {
    fn bare(outcome: TickOutcome) -> Self {
        Self {
            outcome,
            cells: Vec::new(),
        }
    }

    /// Feed this report to a sink: cell changes first, then the signals
    pub fn dispatch<S: CellSink + ?Sized>(&self, sink: &mut S) {
        for change in &self.cells {
            sink.cell_changed(change);
        }
        match self.outcome {
            TickOutcome::Moved => sink.moved(),
            TickOutcome::AteFood => {
                sink.moved();
                sink.food_eaten();
            }
            TickOutcome::GameOver => sink.game_over(),
            TickOutcome::Rejected | TickOutcome::Halted => {}
        }
    }
}

/// Advance the game by one step in the pending direction
pub fn tick(state: &mut GameState) -> TickReport {
    if state.phase == GamePhase::GameOver {
        return TickReport::bare(TickOutcome::Halted);
    }

    let direction = state.pending_direction;
    let edge_before_move = state.edge;
    let (new_head, old_tail) = match state.snake.advance(direction) {
        MoveResult::Moved {
            new_head, old_tail, ..
        } => (new_head, old_tail),
        MoveResult::Rejected => {
            log::trace!("Rejected {} into the neck", direction.as_str());
            return TickReport::bare(TickOutcome::Rejected);
        }
    };
    state.direction = direction;
    state.time_ticks += 1;

    let hit_wall = boundary_collision(&state.grid, new_head, edge_before_move, direction);
    if hit_wall || body_collision(&state.snake, &state.grid) {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game {} over after {} ticks: {} (score {})",
            state.game_id,
            state.time_ticks,
            if hit_wall { "hit the wall" } else { "hit itself" },
            state.score
        );
        return TickReport::bare(TickOutcome::GameOver);
    }

    state.edge = edge_flag(&state.grid, new_head);
    let ate = food_eaten(&state.grid, new_head, state.food);

    let mut cells = Vec::new();
    if let Some(idx) = state.grid.index_of(new_head) {
        // Clears the food flag when the head lands on it
        state.board.set(idx, CellKind::Snake, true, &mut cells);
    }

    if ate {
        state.food = None;
        state.score += 1;
        // Grow before vacating: the new tail usually reclaims the old tail cell
        if let Err(err) = state.grow(&mut cells) {
            log::warn!("Snake could not grow: {}", err);
        }
    }

    // Covers the head stepping into the cell the tail just left, too
    if !state.snake.occupies(old_tail) {
        if let Some(idx) = state.grid.index_of(old_tail) {
            state.board.set(idx, CellKind::Snake, false, &mut cells);
        }
    }

    if state.food.is_none() {
        state.relocate_food(&mut cells);
    }

    TickReport {
        outcome: if ate {
            TickOutcome::AteFood
        } else {
            TickOutcome::Moved
        },
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::Direction;
    use glam::IVec2;

    /// Counts the signals a renderer would see
    #[derive(Default)]
    struct Recorder {
        cells: usize,
        moved: usize,
        eaten: usize,
        game_over: usize,
    }

    impl CellSink for Recorder {
        fn cell_changed(&mut self, _change: &CellChange) {
            self.cells += 1;
        }

        fn moved(&mut self) {
            self.moved += 1;
        }

        fn food_eaten(&mut self) {
            self.eaten += 1;
        }

        fn game_over(&mut self) {
            self.game_over += 1;
        }
    }

    fn game_at(head: IVec2) -> GameState {
        GameState::with_head(GameConfig::default(), 4242, head).unwrap()
    }

    fn food_at(state: &mut GameState, pos: IVec2) {
        let idx = state.grid.index_of(pos).unwrap();
        assert!(state.place_food_at(idx, &mut Vec::new()));
    }

    /// No cell may flip twice in one report
    fn assert_one_change_per_cell(report: &TickReport) {
        let mut seen = std::collections::HashSet::new();
        for change in &report.cells {
            assert!(
                seen.insert((change.idx, change.kind)),
                "cell {} flipped twice: {:?}",
                change.idx,
                report.cells
            );
        }
    }

    fn assert_board_matches_snake(state: &GameState) {
        let lit: Vec<usize> = state
            .board
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.snake)
            .map(|(idx, _)| idx)
            .collect();
        let mut expected: Vec<usize> = state
            .snake
            .positions()
            .into_iter()
            .filter_map(|p| state.grid.index_of(p))
            .collect();
        expected.sort_unstable();
        assert_eq!(lit, expected);
    }

    #[test]
    fn test_tick_moves_head_up() {
        let mut state = game_at(IVec2::new(10, 10));
        food_at(&mut state, IVec2::new(30, 30));

        let report = tick(&mut state);
        assert_eq!(report.outcome, TickOutcome::Moved);
        assert_eq!(state.snake.head().pos, IVec2::new(10, 9));
        assert_eq!(state.snake.head().prev_pos, Some(IVec2::new(10, 10)));
        assert_eq!(state.time_ticks, 1);
        // New head on, old tail off
        assert_eq!(report.cells.len(), 2);
        assert_board_matches_snake(&state);
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut state = game_at(IVec2::new(10, 10));
        // Bypass the input filter to exercise the geometric check
        state.pending_direction = Direction::Down;
        let before = state.snapshot();

        let report = tick(&mut state);
        assert_eq!(report.outcome, TickOutcome::Rejected);
        assert!(report.cells.is_empty());
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_input_reversal_is_filtered() {
        let mut state = game_at(IVec2::new(10, 10));
        food_at(&mut state, IVec2::new(30, 30));

        assert!(!state.request_direction(Direction::Down));
        let report = tick(&mut state);
        assert_eq!(report.outcome, TickOutcome::Moved);
        assert_ne!(state.snake.head().pos, IVec2::new(10, 11));
        assert_eq!(state.snake.head().pos, IVec2::new(10, 9));
    }

    #[test]
    fn test_eating_grows_and_relocates_food() {
        let mut state = game_at(IVec2::new(10, 10));
        food_at(&mut state, IVec2::new(10, 9));

        let report = tick(&mut state);
        assert_eq!(report.outcome, TickOutcome::AteFood);
        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 5);
        // The new tail fills the cell the old tail just left
        assert_eq!(state.snake.tail().pos, IVec2::new(10, 13));

        let food = state.food.unwrap();
        assert!(!state.board.is_snake(food));
        assert!(state.board.is_food(food));
        assert_board_matches_snake(&state);
    }

    #[test]
    fn test_eating_keeps_old_tail_cell_quiet() {
        let mut state = game_at(IVec2::new(10, 10));
        food_at(&mut state, IVec2::new(10, 9));
        let old_tail = state.grid.index_of(IVec2::new(10, 13)).unwrap();

        let report = tick(&mut state);
        assert_eq!(report.outcome, TickOutcome::AteFood);
        assert_one_change_per_cell(&report);
        // The new tail reclaims the cell, so its occupancy never flips
        assert!(report.cells.iter().all(|c| c.idx != old_tail));
        assert!(state.board.is_snake(old_tail));
        // Food off and snake on at the head, food on at the new spot
        assert_eq!(report.cells.len(), 3);
    }

    #[test]
    fn test_missing_food_is_placed_on_next_tick() {
        let mut state = game_at(IVec2::new(10, 10));
        let old_food = state.food.take().unwrap();
        state.board.set(old_food, CellKind::Food, false, &mut Vec::new());

        let report = tick(&mut state);
        assert_eq!(report.outcome, TickOutcome::Moved);
        assert_one_change_per_cell(&report);

        let food = state.food.expect("food placed");
        assert!(state.board.is_food(food));
        assert!(!state.board.is_snake(food));
        assert!(
            report
                .cells
                .iter()
                .any(|c| c.idx == food && c.kind == CellKind::Food && c.active)
        );
    }

    #[test]
    fn test_full_board_leaves_no_food() {
        // 2x2 board: two bites fill every cell
        let config = GameConfig {
            board_size: 4,
            starting_length: 2,
            ..GameConfig::default()
        };
        let mut state = GameState::with_head(config, 3, IVec2::new(0, 0)).unwrap();
        food_at(&mut state, IVec2::new(1, 0));

        assert!(state.request_direction(Direction::Right));
        assert_eq!(tick(&mut state).outcome, TickOutcome::AteFood);
        assert_eq!(state.food, state.grid.index_of(IVec2::new(1, 1)));

        assert!(state.request_direction(Direction::Down));
        let report = tick(&mut state);
        assert_eq!(report.outcome, TickOutcome::AteFood);
        assert_one_change_per_cell(&report);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.food, None);
        assert!(state.board.free_indices().is_empty());

        // Chasing its own tail around the full board keeps going without food
        assert!(state.request_direction(Direction::Left));
        let report = tick(&mut state);
        assert_eq!(report.outcome, TickOutcome::Moved);
        assert!(report.cells.is_empty());
        assert_eq!(state.food, None);
        assert_board_matches_snake(&state);
    }

    #[test]
    fn test_wall_ends_game() {
        let mut state = game_at(IVec2::new(0, 0));
        food_at(&mut state, IVec2::new(30, 30));

        let report = tick(&mut state);
        assert_eq!(report.outcome, TickOutcome::GameOver);
        assert!(report.cells.is_empty());
        assert!(state.is_over());
        assert_eq!(tick(&mut state).outcome, TickOutcome::Halted);
    }

    #[test]
    fn test_left_wall_exit_is_not_a_row_wrap() {
        let mut state = game_at(IVec2::new(1, 10));
        // The cell "left of column 0" aliases the last cell of the row above
        food_at(&mut state, IVec2::new(41, 9));
        assert!(state.request_direction(Direction::Left));

        assert_eq!(tick(&mut state).outcome, TickOutcome::Moved);
        assert_eq!(state.edge, crate::sim::BorderKind::Left);

        let report = tick(&mut state);
        assert_eq!(report.outcome, TickOutcome::GameOver);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_right_wall_exit() {
        let mut state = game_at(IVec2::new(40, 10));
        food_at(&mut state, IVec2::new(5, 30));
        assert!(state.request_direction(Direction::Right));

        assert_eq!(tick(&mut state).outcome, TickOutcome::Moved);
        assert_eq!(tick(&mut state).outcome, TickOutcome::GameOver);
    }

    #[test]
    fn test_collision_beats_food() {
        let mut state = GameState::with_head(
            GameConfig {
                starting_length: 5,
                ..GameConfig::default()
            },
            1,
            IVec2::new(5, 5),
        )
        .unwrap();
        food_at(&mut state, IVec2::new(30, 30));
        assert!(state.request_direction(Direction::Right));
        tick(&mut state);
        assert!(state.request_direction(Direction::Down));
        tick(&mut state);

        // Force the food under the body cell the head is about to hit
        let target = state.grid.index_of(IVec2::new(5, 6)).unwrap();
        state.food = Some(target);
        assert!(state.request_direction(Direction::Left));

        let mut recorder = Recorder::default();
        let report = tick(&mut state);
        report.dispatch(&mut recorder);

        assert_eq!(report.outcome, TickOutcome::GameOver);
        assert_eq!(recorder.game_over, 1);
        assert_eq!(recorder.eaten, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 5);
    }

    #[test]
    fn test_square_loop_without_obstacles() {
        let mut state = game_at(IVec2::new(10, 10));
        food_at(&mut state, IVec2::new(30, 30));
        let mut recorder = Recorder::default();

        for dir in [Direction::Right, Direction::Down, Direction::Left, Direction::Up] {
            assert!(state.request_direction(dir));
            tick(&mut state).dispatch(&mut recorder);
        }

        assert_eq!(recorder.moved, 4);
        assert_eq!(recorder.cells, 8);
        assert_eq!(recorder.game_over, 0);
        assert_eq!(state.direction, Direction::Up);
        assert_eq!(state.snake.head().pos, IVec2::new(10, 10));
        assert_board_matches_snake(&state);
    }

    #[test]
    fn test_tight_turns_into_own_body() {
        let mut state = game_at(IVec2::new(5, 5));
        assert_eq!(state.snake.len(), 4);
        // A length-4 snake cannot close a 2x2 loop on itself; one bite
        // makes it long enough
        food_at(&mut state, IVec2::new(6, 5));
        let mut recorder = Recorder::default();

        for dir in [Direction::Right, Direction::Down, Direction::Left, Direction::Up] {
            state.request_direction(dir);
            tick(&mut state).dispatch(&mut recorder);
        }

        assert!(recorder.eaten >= 1);
        assert_eq!(recorder.game_over, 1);
        assert!(state.is_over());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(GameConfig::default(), 99999).unwrap();
        let mut state2 = GameState::new(GameConfig::default(), 99999).unwrap();

        let inputs = [Direction::Right, Direction::Up, Direction::Left, Direction::Up];
        for dir in inputs {
            state1.request_direction(dir);
            state2.request_direction(dir);
            assert_eq!(tick(&mut state1), tick(&mut state2));
        }
        assert_eq!(state1.snapshot(), state2.snapshot());
    }
}
