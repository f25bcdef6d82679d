//! Plain-text board used by the native build and in tests

use crate::sim::{Board, CellChange, CellKind};

use super::CellSink;

const EMPTY_CHAR: char = '.';
const SNAKE_CHAR: char = '#';
const FOOD_CHAR: char = '@';

/// Character grid kept in sync through `CellSink`
#[derive(Debug, Clone)]
pub struct TextRenderer {
    rows: usize,
    chars: Vec<char>,
    pub game_over: bool,
}

impl TextRenderer {
    /// Paint every cell of `board`
    pub fn from_board(board: &Board, rows: usize) -> Self {
        let chars = board
            .cells()
            .iter()
            .map(|c| {
                if c.snake {
                    SNAKE_CHAR
                } else if c.food {
                    FOOD_CHAR
                } else {
                    EMPTY_CHAR
                }
            })
            .collect();
        Self {
            rows,
            chars,
            game_over: false,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.chars.len() + self.rows);
        for row in self.chars.chunks(self.rows.max(1)) {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

impl CellSink for TextRenderer {
    fn cell_changed(&mut self, change: &CellChange) {
        let Some(slot) = self.chars.get_mut(change.idx) else {
            return;
        };
        *slot = match (change.kind, change.active) {
            (CellKind::Snake, true) => SNAKE_CHAR,
            (CellKind::Food, true) => FOOD_CHAR,
            // Only clear the cell if the other kind is not drawn there
            (CellKind::Snake, false) if *slot == SNAKE_CHAR => EMPTY_CHAR,
            (CellKind::Food, false) if *slot == FOOD_CHAR => EMPTY_CHAR,
            _ => *slot,
        };
    }

    fn game_over(&mut self) {
        self.game_over = true;
    }
}
