//! Game state and setup
//!
//! Everything one game needs lives in `GameState`, including its RNG, so
//! several games can run side by side and a seed fully determines a run.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chain::SegmentChain;
use super::collision::edge_flag;
use super::direction::Direction;
use super::food::pick_food_cell;
use super::grid::{Board, BorderKind, CellChange, CellKind, Grid};
use crate::config::GameConfig;
use crate::error::{SnekError, SnekResult};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Run ended; only a restart leaves this phase
    GameOver,
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub grid: Grid,
    pub board: Board,
    pub snake: SegmentChain,
    /// Linear index of the food cell
    pub food: Option<usize>,
    /// Direction of the last successful move
    pub direction: Direction,
    /// Direction the next tick will try
    pub pending_direction: Direction,
    pub phase: GamePhase,
    /// Border tag of the head after the last move
    pub edge: BorderKind,
    /// Food eaten this run
    pub score: u64,
    /// Successful ticks this run
    pub time_ticks: u64,
    /// Changes on every restart
    pub game_id: u64,
    pub seed: u64,
    rng: Pcg32,
}

impl GameState {
    /// Start a game with a randomly placed snake
    pub fn new(config: GameConfig, seed: u64) -> SnekResult<Self> {
        Self::build(config, seed, 1, None)
    }

    /// Start a game with the head at a fixed position
    pub fn with_head(config: GameConfig, seed: u64, head: IVec2) -> SnekResult<Self> {
        Self::build(config, seed, 1, Some(head))
    }

    fn build(config: GameConfig, seed: u64, game_id: u64, head: Option<IVec2>) -> SnekResult<Self> {
        let grid = config.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut snake = match head {
            Some(pos) if grid.contains(pos) => SegmentChain::new_at(pos),
            Some(_) => {
                return Err(SnekError::InvalidConfiguration(
                    "snake head is off the board",
                ));
            }
            None => SegmentChain::create_head(&grid, config.starting_length, &mut rng)?,
        };
        while snake.len() < config.starting_length {
            snake.append_tail(true, &grid)?;
        }

        let mut state = Self {
            board: Board::new(&grid),
            edge: edge_flag(&grid, snake.head().pos),
            grid,
            snake,
            food: None,
            direction: Direction::Up,
            pending_direction: Direction::Up,
            phase: GamePhase::Playing,
            score: 0,
            time_ticks: 0,
            game_id,
            seed,
            config,
            rng,
        };

        // The host repaints the whole board after setup
        let mut changes = Vec::new();
        for pos in state.snake.positions() {
            if let Some(idx) = state.grid.index_of(pos) {
                state.board.set(idx, CellKind::Snake, true, &mut changes);
            }
        }
        state.relocate_food(&mut changes);

        log::info!(
            "Game {} started: seed {}, {}x{} board, snake at {:?}",
            state.game_id,
            seed,
            state.grid.rows(),
            state.grid.rows(),
            state.snake.head().pos
        );
        Ok(state)
    }

    /// Throw away the current run and start a new one
    pub fn restart(&mut self, seed: u64) -> SnekResult<()> {
        *self = Self::build(self.config.clone(), seed, self.game_id + 1, None)?;
        Ok(())
    }

    /// Queue a direction for the next tick
    ///
    /// Turning straight back against the last move is refused. Returns
    /// whether the request was accepted.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Move the food to a random free cell
    pub fn relocate_food(&mut self, changes: &mut Vec<CellChange>) -> Option<usize> {
        if let Some(old) = self.food.take() {
            self.board.set(old, CellKind::Food, false, changes);
        }
        let idx = pick_food_cell(&self.board, &mut self.rng, self.config.max_food_attempts);
        match idx {
            Some(idx) => {
                self.board.set(idx, CellKind::Food, true, changes);
                self.food = Some(idx);
                log::debug!("Food placed at {}", idx);
            }
            None => log::warn!("No free cell left for food"),
        }
        idx
    }

    /// Put the food on a specific cell; refuses occupied or missing cells
    pub fn place_food_at(&mut self, idx: usize, changes: &mut Vec<CellChange>) -> bool {
        if idx >= self.grid.cell_count() || self.board.is_snake(idx) {
            return false;
        }
        if let Some(old) = self.food.take() {
            self.board.set(old, CellKind::Food, false, changes);
        }
        self.board.set(idx, CellKind::Food, true, changes);
        self.food = Some(idx);
        true
    }

    /// Add a segment behind the tail and light its cell
    pub fn grow(&mut self, changes: &mut Vec<CellChange>) -> SnekResult<()> {
        let id = self.snake.append_tail(false, &self.grid)?;
        let pos = self.snake.segment(id).pos;
        if let Some(idx) = self.grid.index_of(pos) {
            self.board.set(idx, CellKind::Snake, true, changes);
        }
        log::debug!("Snake grew to {} segments", self.snake.len());
        Ok(())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.game_id,
            phase: self.phase,
            direction: self.direction,
            pending_direction: self.pending_direction,
            score: self.score,
            time_ticks: self.time_ticks,
            rows: self.grid.rows(),
            segments: self.snake.positions(),
            food: self.food,
        }
    }
}

/// Read-only view of a game for hosts and tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: u64,
    pub phase: GamePhase,
    pub direction: Direction,
    pub pending_direction: Direction,
    pub score: u64,
    pub time_ticks: u64,
    pub rows: i32,
    /// Head first
    pub segments: Vec<IVec2>,
    pub food: Option<usize>,
}
