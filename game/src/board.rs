use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::piece::{PieceKind, Shape};

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(PieceKind),
}

impl Cell {
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn is_empty(self) -> bool {
        !self.is_filled()
    }

    /// Numeric id for renderers: `0` for empty, the piece's color id otherwise.
    pub fn color_id(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.color_id(),
        }
    }
}

/// Top-left anchor of a shape in board space. Rows grow downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub row: i32,
    pub col: i32,
}

impl Offset {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Self::Output {
        Offset::new(self.row + rhs.row, self.col + rhs.col)
    }
}

/// The settled well. Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![Cell::Empty; cols]; rows],
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn col_count(&self) -> usize {
        self.cols
    }

    pub fn grid(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(Cell::Empty)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.rows && col < self.cols {
            self.cells[row][col] = cell;
        }
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells
            .get(row)
            .is_some_and(|r| r.iter().all(|cell| cell.is_filled()))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|cell| cell.is_empty())
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_filled()).count()
    }

    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::Empty);
        }
    }

    /// True if any filled shape cell lands outside the side walls, on or below the
    /// floor, or on an occupied cell. Cells above the top edge are allowed.
    pub fn collides(&self, shape: &Shape, offset: Offset) -> bool {
        shape.filled_cells().any(|(r, c, _)| {
            let row = offset.row + r as i32;
            let col = offset.col + c as i32;

            if col < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
                return true;
            }
            if row < 0 {
                return false;
            }
            self.cells[row as usize][col as usize].is_filled()
        })
    }

    /// Writes the shape's filled cells into the board. Cells above the top edge are dropped.
    pub fn merge(&mut self, shape: &Shape, offset: Offset) {
        for (r, c, kind) in shape.filled_cells() {
            let row = offset.row + r as i32;
            let col = offset.col + c as i32;
            if row < 0 || col < 0 || row >= self.rows as i32 || col >= self.cols as i32 {
                continue;
            }
            self.cells[row as usize][col as usize] = Cell::Filled(kind);
        }
    }

    /// Removes every full row, shifting the rows above down, and returns how many went.
    pub fn sweep(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.rows;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.cells.remove(row);
                self.cells.insert(0, vec![Cell::Empty; self.cols]);
                cleared += 1;
                // The row that slid into `row` has not been checked yet.
                continue;
            }
            y -= 1;
        }
        cleared
    }

    pub fn color_grid(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.color_id()).collect())
            .collect()
    }
}
