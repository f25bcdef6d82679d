//! Square grid geometry and per-cell occupancy
//!
//! Cells are addressed either by (x, y) or by the linear index `y * R + x`.
//! A linear index alone cannot tell "column -1 of row N" from "column R-1 of
//! row N-1", so each cell also carries a border classification that the
//! collision checks use for horizontal exits.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::{SnekError, SnekResult};

/// Which edge of the board a cell sits on
///
/// Corners classify as Left/Right: vertical exits are caught by the index
/// range, horizontal ones need this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BorderKind {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
}

/// Fixed R×R coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: i32,
}

impl Grid {
    /// Build a grid for `board_size` cells. The size must be a perfect square.
    pub fn new(board_size: usize) -> SnekResult<Self> {
        let rows = board_size.isqrt();
        if board_size == 0 || rows * rows != board_size {
            return Err(SnekError::InvalidBoardSize { board_size });
        }
        let rows = i32::try_from(rows)
            .map_err(|_| SnekError::InvalidConfiguration("board is too large"))?;
        Ok(Self { rows })
    }

    /// Side length R
    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Total number of cells (R²)
    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.rows as usize) * (self.rows as usize)
    }

    /// Raw linear index. May fall outside `[0, R²)` for off-board positions.
    #[inline]
    pub fn to_index(&self, x: i32, y: i32) -> i64 {
        i64::from(y) * i64::from(self.rows) + i64::from(x)
    }

    /// Linear index of `pos`, if the index maps to an existing cell
    ///
    /// This only checks the index range: a position one column off the left
    /// or right edge still lands on a cell of the neighbouring row.
    pub fn index_in_range(&self, pos: IVec2) -> Option<usize> {
        let idx = self.to_index(pos.x, pos.y);
        (0..self.cell_count() as i64)
            .contains(&idx)
            .then_some(idx as usize)
    }

    /// Linear index of an on-board position
    pub fn index_of(&self, pos: IVec2) -> Option<usize> {
        self.contains(pos).then(|| self.to_index(pos.x, pos.y) as usize)
    }

    pub fn to_coords(&self, idx: usize) -> IVec2 {
        let rows = self.rows as usize;
        IVec2::new((idx % rows) as i32, (idx / rows) as i32)
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        (0..self.rows).contains(&pos.x) && (0..self.rows).contains(&pos.y)
    }

    pub fn classify(&self, x: i32, y: i32) -> BorderKind {
        let last = self.rows - 1;
        if x == 0 {
            BorderKind::Left
        } else if x == last {
            BorderKind::Right
        } else if y == 0 {
            BorderKind::Top
        } else if y == last {
            BorderKind::Bottom
        } else {
            BorderKind::None
        }
    }
}

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Food,
    Snake,
}

impl CellKind {
    pub fn other(self) -> Self {
        match self {
            CellKind::Food => CellKind::Snake,
            CellKind::Snake => CellKind::Food,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Food => "fud",
            CellKind::Snake => "snek",
        }
    }
}

/// Display and occupancy state for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub active: bool,
    pub food: bool,
    pub snake: bool,
    pub border: BorderKind,
}

/// A single cell flipping on or off for one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub idx: usize,
    pub x: i32,
    pub y: i32,
    pub kind: CellKind,
    pub active: bool,
}

/// Occupancy for every cell of a grid, indexed linearly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(grid: &Grid) -> Self {
        let cells = (0..grid.cell_count())
            .map(|idx| {
                let pos = grid.to_coords(idx);
                Cell {
                    x: pos.x,
                    y: pos.y,
                    active: false,
                    food: false,
                    snake: false,
                    border: grid.classify(pos.x, pos.y),
                }
            })
            .collect();
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, idx: usize) -> Option<&Cell> {
        self.cells.get(idx)
    }

    pub fn is_snake(&self, idx: usize) -> bool {
        self.cells.get(idx).is_some_and(|c| c.snake)
    }

    pub fn is_food(&self, idx: usize) -> bool {
        self.cells.get(idx).is_some_and(|c| c.food)
    }

    pub fn is_occupied(&self, idx: usize) -> bool {
        self.cells.get(idx).is_some_and(|c| c.food || c.snake)
    }

    /// Indices of cells holding neither food nor snake
    pub fn free_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.food && !c.snake)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Switch `kind` on or off at `idx`, recording every flag that flips
    ///
    /// Switching one kind on clears the other first, so a cell never holds
    /// both food and snake.
    pub fn set(&mut self, idx: usize, kind: CellKind, active: bool, changes: &mut Vec<CellChange>) {
        let Some(cell) = self.cells.get_mut(idx) else {
            return;
        };

        if active {
            let other = kind.other();
            let other_flag = flag_mut(cell, other);
            if *other_flag {
                *other_flag = false;
                changes.push(change_for(idx, cell, other, false));
            }
        }

        let flag = flag_mut(cell, kind);
        if *flag != active {
            *flag = active;
            changes.push(change_for(idx, cell, kind, active));
        }
        cell.active = cell.food || cell.snake;
    }
}

fn flag_mut(cell: &mut Cell, kind: CellKind) -> &mut bool {
    match kind {
        CellKind::Food => &mut cell.food,
        CellKind::Snake => &mut cell.snake,
    }
}

fn change_for(idx: usize, cell: &Cell, kind: CellKind, active: bool) -> CellChange {
    CellChange {
        idx,
        x: cell.x,
        y: cell.y,
        kind,
        active,
    }
}
