//! Board module - the playing field and everything it owns
//!
//! The board is a 10x20 grid where each cell is empty or holds the shape that
//! filled it. Uses a flat array for cache locality and zero allocation.
//! Coordinates: (col, row) where col ranges 0..9 (left to right), row ranges
//! 0..19 (top to bottom).
//!
//! Besides the grid the board owns the running score, the cleared line count,
//! the game-over latch, the hold slot and the supply queue.

use arrayvec::ArrayVec;
use tracing::{debug, info, warn};

use crate::piece::Piece;
use crate::rng::SupplyQueue;
use crate::snapshot::Grid;
use crate::types::{Cell, Pos, Shape, BOARD_HEIGHT, BOARD_WIDTH, LINE_CLEAR_POINTS};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Number of rows, usable as a capacity.
pub const ROW_COUNT: usize = BOARD_HEIGHT as usize;

/// Row indices, ascending.
pub type RowSet = ArrayVec<u8, ROW_COUNT>;

/// Outcome of one [`Board::clear_full_lines`] pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineClear {
    /// Rows that were full before the pass, top to bottom.
    pub rows: RowSet,
    /// Score awarded for the pass.
    pub points: u32,
}

impl LineClear {
    pub fn count(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Points for clearing `lines` rows in one pass: `lines^2 * 100`.
pub fn points_for(lines: u32) -> u32 {
    lines * lines * LINE_CLEAR_POINTS
}

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone)]
pub struct Board {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [Cell; BOARD_SIZE],
    score: u32,
    lines_cleared: u32,
    game_over: bool,
    held: Option<Piece>,
    supply: SupplyQueue,
}

impl Board {
    /// Create an empty board whose supply queue is seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        Self {
            cells: [None; BOARD_SIZE],
            score: 0,
            lines_cleared: 0,
            game_over: false,
            held: None,
            supply: SupplyQueue::new(seed),
        }
    }

    /// Calculate flat index from (col, row) coordinates
    #[inline(always)]
    fn index(col: i8, row: i8) -> Option<usize> {
        if col < 0 || col >= BOARD_WIDTH as i8 || row < 0 || row >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((row as usize) * (BOARD_WIDTH as usize) + (col as usize))
    }

    /// Collision test used by every move and rotation.
    ///
    /// Outside the side walls or below the floor is blocked. Rows above the
    /// visible field are never blocked, so a piece may hang off the top.
    pub fn is_blocked(&self, col: i8, row: i8) -> bool {
        if col < 0 || col >= BOARD_WIDTH as i8 || row >= BOARD_HEIGHT as i8 {
            return true;
        }
        if row < 0 {
            return false;
        }
        self.is_occupied(col, row)
    }

    pub fn is_blocked_at(&self, pos: Pos) -> bool {
        self.is_blocked(pos.col, pos.row)
    }

    /// Get cell at position (col, row)
    /// Returns None if out of bounds
    pub fn get(&self, col: i8, row: i8) -> Option<Cell> {
        Self::index(col, row).map(|idx| self.cells[idx])
    }

    /// Set cell at position (col, row)
    /// Returns false if out of bounds
    pub fn set(&mut self, col: i8, row: i8, cell: Cell) -> bool {
        match Self::index(col, row) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, col: i8, row: i8) -> bool {
        matches!(self.get(col, row), Some(Some(_)))
    }

    /// Write a piece's cells into the grid.
    ///
    /// Every in-bounds cell is written. If any cell sits above the field or
    /// lands on an occupied cell the stack has overflowed and the game-over
    /// latch is set. Returns `false` in that case.
    pub fn deposit(&mut self, cells: &[Pos; 4], shape: Shape) -> bool {
        let mut ok = true;
        for cell in cells {
            if cell.row < 0 || self.is_occupied(cell.col, cell.row) {
                ok = false;
            }
            self.set(cell.col, cell.row, Some(shape));
        }
        if !ok && !self.game_over {
            warn!(shape = shape.as_str(), ?cells, "deposit overflowed the board");
            self.game_over = true;
        }
        ok
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= ROW_COUNT {
            return false;
        }
        let start = row * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Indices of every full row, ascending.
    pub fn full_rows(&self) -> RowSet {
        (0..ROW_COUNT)
            .filter(|&row| self.is_row_full(row))
            .map(|row| row as u8)
            .collect()
    }

    /// Empty a row and shift every row above it down by one.
    ///
    /// Returns false if `row` is off the board.
    pub fn clear_row(&mut self, row: usize) -> bool {
        if row >= ROW_COUNT {
            return false;
        }

        let width = BOARD_WIDTH as usize;

        // copy_within handles the overlapping ranges
        for r in (1..=row).rev() {
            let src_start = (r - 1) * width;
            self.cells.copy_within(src_start..src_start + width, r * width);
        }

        for cell in &mut self.cells[..width] {
            *cell = None;
        }

        true
    }

    /// Clear every full row and award points.
    ///
    /// The full set is taken before anything moves. Rows are then cleared top
    /// to bottom: each clear only shifts rows above it, so the remaining
    /// (lower) indices stay valid.
    pub fn clear_full_lines(&mut self) -> LineClear {
        let rows = self.full_rows();
        for &row in &rows {
            self.clear_row(row as usize);
        }

        let count = rows.len() as u32;
        let points = points_for(count);
        if count > 0 {
            self.score += points;
            self.lines_cleared += count;
            info!(
                lines = count,
                points,
                score = self.score,
                total_lines = self.lines_cleared,
                "cleared lines"
            );
        }

        LineClear { rows, points }
    }

    /// Closing animation after game over: drop everything by one row.
    pub fn drain_step(&mut self) {
        self.clear_row(ROW_COUNT - 1);
    }

    /// True when no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the grid into a row-major 2-D array.
    pub fn copy_into(&self, grid: &mut Grid) {
        let width = BOARD_WIDTH as usize;
        for (row, cells) in grid.iter_mut().enumerate() {
            cells.copy_from_slice(&self.cells[row * width..(row + 1) * width]);
        }
    }

    pub fn to_grid(&self) -> Grid {
        let mut grid = [[None; BOARD_WIDTH as usize]; ROW_COUNT];
        self.copy_into(&mut grid);
        grid
    }

    /// One row of cells, left to right.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= ROW_COUNT {
            return None;
        }
        let width = BOARD_WIDTH as usize;
        Some(&self.cells[row * width..(row + 1) * width])
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Pop the next shape off the supply queue and put it into play.
    pub fn next_piece(&mut self) -> Piece {
        let shape = self.supply.pop_next();
        debug!(shape = shape.as_str(), queued = self.supply.len(), "spawn");
        let mut piece = Piece::new(shape);
        piece.project_ghost(self);
        piece
    }

    /// Upcoming shapes, head first (at most seven).
    pub fn preview(&self, n: usize) -> impl Iterator<Item = Shape> + '_ {
        self.supply.preview(n)
    }

    pub fn supply(&self) -> &SupplyQueue {
        &self.supply
    }

    /// Swap `piece` into the hold slot.
    ///
    /// A piece that already used its hold comes straight back. Otherwise it
    /// loses its hold right, is put back at spawn, and is exchanged for the
    /// held piece, or for the next queued piece when the slot is empty.
    pub fn hold(&mut self, piece: Piece) -> Piece {
        if !piece.can_hold() {
            return piece;
        }

        let mut departing = piece;
        departing.set_can_hold(false);
        departing.reset();
        debug!(shape = departing.shape().as_str(), "hold");

        match self.held.replace(departing) {
            Some(mut restored) => {
                restored.project_ghost(self);
                restored
            }
            None => self.next_piece(),
        }
    }

    /// The piece waiting in the hold slot.
    pub fn held(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    /// Render the grid as text, one line per row (`.` empty, shape letter otherwise).
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(BOARD_SIZE + ROW_COUNT);
        for row in self.cells.chunks(BOARD_WIDTH as usize) {
            for cell in row {
                match cell {
                    Some(shape) => out.push_str(&shape.as_str().to_uppercase()),
                    None => out.push('.'),
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(1)
    }
}
