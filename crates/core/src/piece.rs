//! Piece module - the falling piece
//!
//! A piece is four independently tracked cells that always move in lock-step,
//! an orientation index, the ghost projection and the one-shot hold flag.
//! Rotation goes through the shape's own transition table in [`crate::catalog`].

use crate::board::Board;
use crate::catalog::{self, Transition};
use crate::types::{
    Color, Direction, Orientation, Pos, Shape, MAX_DROP_DISTANCE, RESET_CLEARANCE_ROW,
};

/// An active (or held) piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    shape: Shape,
    cells: [Pos; 4],
    orientation: Orientation,
    ghost: [Pos; 4],
    can_hold: bool,
}

impl Piece {
    /// Create a piece at its spawn cells in orientation 1.
    pub fn new(shape: Shape) -> Self {
        let cells = catalog::spawn_cells(shape);
        Self {
            shape,
            cells,
            orientation: Orientation::SPAWN,
            ghost: cells,
            can_hold: true,
        }
    }

    /// Create a spawn-orientation piece shifted by `(dcol, drow)` from spawn.
    pub fn at(shape: Shape, dcol: i8, drow: i8) -> Self {
        let cells = catalog::cells_at(shape, dcol, drow);
        Self {
            cells,
            ghost: cells,
            ..Self::new(shape)
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn color(&self) -> Color {
        catalog::color_of(self.shape)
    }

    /// Cell positions in cell-index order.
    pub fn cells(&self) -> [Pos; 4] {
        self.cells
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Where the piece would land on a hard drop, as of the last projection.
    pub fn ghost(&self) -> [Pos; 4] {
        self.ghost
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub(crate) fn set_can_hold(&mut self, can_hold: bool) {
        self.can_hold = can_hold;
    }

    /// True iff every cell translated by `(dcol, drow)` is unblocked.
    ///
    /// A translation that leaves the coordinate range counts as blocked.
    pub fn can_move(&self, board: &Board, dcol: i8, drow: i8) -> bool {
        self.cells.iter().all(|c| match c.checked_offset(dcol, drow) {
            Some(dest) => !board.is_blocked_at(dest),
            None => false,
        })
    }

    /// Translate if possible. A blocked move is a no-op returning false.
    pub fn move_by(&mut self, board: &Board, dcol: i8, drow: i8) -> bool {
        if !self.can_move(board, dcol, drow) {
            return false;
        }
        self.translate(dcol, drow);
        self.project_ghost(board);
        true
    }

    fn translate(&mut self, dcol: i8, drow: i8) {
        for cell in &mut self.cells {
            *cell = cell.offset(dcol, drow);
        }
    }

    /// Whether the fixed transition for `direction` fits on `board`.
    ///
    /// Only the probe cells (the destinations the piece does not already
    /// cover) are checked. The O piece never rotates.
    pub fn can_rotate(&self, board: &Board, direction: Direction) -> bool {
        match catalog::transition(self.shape, self.orientation, direction) {
            Some(tr) => self.probes_clear(board, tr),
            None => false,
        }
    }

    fn probes_clear(&self, board: &Board, tr: &Transition) -> bool {
        let anchor = self.cells[tr.anchor];
        tr.probes
            .iter()
            .all(|&(dc, dr)| match anchor.checked_offset(dc, dr) {
                Some(probe) => !board.is_blocked_at(probe),
                None => false,
            })
    }

    /// Rotate one step if the transition fits. A blocked rotation is a no-op.
    pub fn rotate(&mut self, board: &Board, direction: Direction) -> bool {
        if !self.can_rotate(board, direction) {
            return false;
        }
        self.rotate_unchecked(direction);
        self.project_ghost(board);
        true
    }

    /// Apply the transition without checking the board.
    fn rotate_unchecked(&mut self, direction: Direction) {
        let Some(tr) = catalog::transition(self.shape, self.orientation, direction) else {
            return;
        };
        for (cell, &(dc, dr)) in self.cells.iter_mut().zip(tr.deltas.iter()) {
            *cell = cell.offset(dc, dr);
        }
        self.orientation = Orientation::new(tr.to).unwrap_or(Orientation::SPAWN);
    }

    /// How many rows the piece can fall before it is blocked.
    pub fn drop_distance(&self, board: &Board) -> i8 {
        let mut distance = 0;
        while distance < MAX_DROP_DISTANCE && self.can_move(board, 0, distance + 1) {
            distance += 1;
        }
        distance
    }

    /// Recompute the ghost for the current position.
    pub fn project_ghost(&mut self, board: &Board) {
        let distance = self.drop_distance(board);
        self.ghost = self.cells.map(|c| c.offset(0, distance));
    }

    /// Drop straight down as far as possible and deposit.
    ///
    /// Consumes the piece. Returns the board's deposit result (`false` means
    /// the stack overflowed and the game is over).
    pub fn hard_drop(mut self, board: &mut Board) -> bool {
        let distance = self.drop_distance(board);
        self.translate(0, distance);
        board.deposit(&self.cells, self.shape)
    }

    /// Deposit where it stands.
    pub fn deposit(self, board: &mut Board) -> bool {
        board.deposit(&self.cells, self.shape)
    }

    /// Put the piece back at its spawn cells in orientation 1.
    ///
    /// Lifted above the field first, where nothing can block it, then walked
    /// back through its own rotation table, then moved onto the spawn cells.
    /// The spawn cells are not checked against the board.
    pub fn reset(&mut self) {
        // Cells sit at most three rows from cell 0, so all of them clear the row.
        let lifted = Pos::new(self.cells[0].col, RESET_CLEARANCE_ROW - 4);
        self.relocate(lifted);
        // A four-state cycle reaches orientation 1 within three steps.
        for _ in 0..3 {
            if self.orientation == Orientation::SPAWN {
                break;
            }
            self.rotate_unchecked(Direction::Clockwise);
        }
        self.relocate(catalog::spawn_cells(self.shape)[0]);
        self.ghost = self.cells;
    }

    /// Move the piece so cell 0 lands on `target`, keeping its footprint.
    ///
    /// Works from offsets to cell 0, so any starting height is safe.
    fn relocate(&mut self, target: Pos) {
        let base = self.cells[0];
        self.cells = self.cells.map(|c| {
            Pos::new(
                target.col + (c.col - base.col),
                target.row + (c.row - base.row),
            )
        });
    }

    /// Build a piece in a given orientation by walking clockwise from spawn.
    ///
    /// Handy for tests and board setups; the walk ignores the board.
    pub fn oriented(shape: Shape, orientation: Orientation, dcol: i8, drow: i8) -> Self {
        let mut piece = Self::at(shape, dcol, drow);
        for _ in 0..4 {
            if piece.orientation == orientation {
                break;
            }
            piece.rotate_unchecked(Direction::Clockwise);
        }
        piece.ghost = piece.cells;
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BOARD_WIDTH;

    const ALL: [Shape; 7] = [
        Shape::I,
        Shape::O,
        Shape::T,
        Shape::S,
        Shape::Z,
        Shape::J,
        Shape::L,
    ];

    fn sorted(mut cells: [Pos; 4]) -> [Pos; 4] {
        cells.sort();
        cells
    }

    #[test]
    fn test_new_piece_at_spawn() {
        let piece = Piece::new(Shape::T);
        assert_eq!(piece.cells(), catalog::spawn_cells(Shape::T));
        assert_eq!(piece.orientation(), Orientation::SPAWN);
        assert!(piece.can_hold());
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let board = Board::default();
        let mut piece = Piece::new(Shape::O);
        // O spawns in columns 4..=5.
        for _ in 0..4 {
            assert!(piece.move_by(&board, -1, 0));
        }
        let before = piece.cells();
        assert!(!piece.move_by(&board, -1, 0));
        assert_eq!(piece.cells(), before);
    }

    #[test]
    fn test_move_above_field_is_allowed() {
        let board = Board::default();
        let mut piece = Piece::new(Shape::I);
        assert!(piece.move_by(&board, 0, -5));
        assert!(piece.cells().iter().all(|c| c.row == -5));
    }

    #[test]
    fn test_out_of_range_move_is_blocked() {
        let board = Board::default();
        let mut piece = Piece::at(Shape::T, 0, 1);
        let before = piece;
        assert!(!piece.can_move(&board, 0, i8::MAX));
        assert!(!piece.move_by(&board, 0, i8::MAX));
        assert!(!piece.move_by(&board, i8::MIN, 0));
        assert!(!piece.move_by(&board, i8::MAX, 0));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_reset_from_far_above_field() {
        let board = Board::default();
        let mut piece = Piece::oriented(Shape::I, Orientation::new(4).unwrap(), 0, 0);
        while piece.move_by(&board, 0, -16) {}
        while piece.move_by(&board, 0, -1) {}
        assert!(piece.cells().iter().any(|c| c.row == i8::MIN));
        piece.reset();
        assert_eq!(piece.cells(), catalog::spawn_cells(Shape::I));
        assert_eq!(piece.orientation(), Orientation::SPAWN);
    }

    #[test]
    fn test_can_move_is_pure() {
        let board = Board::default();
        let piece = Piece::new(Shape::S);
        let copy = piece;
        assert!(piece.can_move(&board, 0, 1));
        assert!(!piece.can_move(&board, -4, 0));
        assert_eq!(piece, copy);
    }

    #[test]
    fn test_o_never_rotates() {
        let board = Board::default();
        let mut piece = Piece::at(Shape::O, 0, 5);
        let before = piece;
        assert!(!piece.rotate(&board, Direction::Clockwise));
        assert!(!piece.rotate(&board, Direction::CounterClockwise));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_rotation_round_trip_in_open_space() {
        let board = Board::default();
        for shape in ALL {
            if shape == Shape::O {
                continue;
            }
            for i in 1..=4 {
                let o = Orientation::new(i).unwrap();
                let start = Piece::oriented(shape, o, 0, 8);
                let mut piece = start;
                assert!(piece.rotate(&board, Direction::Clockwise), "{shape:?} {i}");
                assert!(piece.rotate(&board, Direction::CounterClockwise));
                assert_eq!(piece.cells(), start.cells(), "{shape:?} {i}");
                assert_eq!(piece.orientation(), o);
            }
        }
    }

    #[test]
    fn test_t_rotation_blocked_by_probe() {
        let mut board = Board::default();
        let piece = Piece::at(Shape::T, 0, 8);
        // Clockwise from 1 needs the cell above the stem.
        let stem = piece.cells()[1];
        board.set(stem.col, stem.row - 1, Some(Shape::I));
        let mut blocked = piece;
        assert!(!blocked.rotate(&board, Direction::Clockwise));
        assert_eq!(blocked, piece);
    }

    #[test]
    fn test_i_vertical_needs_three_cells() {
        let mut board = Board::default();
        let piece = Piece::at(Shape::I, 0, 8);
        assert!(piece.can_rotate(&board, Direction::Clockwise));
        let pivot = piece.cells()[2];
        board.set(pivot.col, pivot.row + 2, Some(Shape::O));
        assert!(!piece.can_rotate(&board, Direction::Clockwise));
    }

    #[test]
    fn test_j_clockwise_steps_downward() {
        let board = Board::default();
        let mut piece = Piece::at(Shape::J, 0, 8);
        piece.rotate(&board, Direction::Clockwise);
        assert_eq!(piece.orientation().index(), 4);
    }

    #[test]
    fn test_drop_distance_and_ghost() {
        let board = Board::default();
        let mut piece = Piece::new(Shape::O);
        assert_eq!(piece.drop_distance(&board), 18);
        piece.project_ghost(&board);
        assert!(piece.ghost().iter().all(|c| c.row >= 18));
        for (g, c) in piece.ghost().iter().zip(piece.cells().iter()) {
            assert_eq!(g.col, c.col);
            assert!(g.row >= c.row);
        }
    }

    #[test]
    fn test_ghost_is_not_authoritative() {
        let board = Board::default();
        let mut piece = Piece::new(Shape::T);
        piece.project_ghost(&board);
        assert!(board.is_empty());
        assert!(piece.can_move(&board, 0, 1));
    }

    #[test]
    fn test_hard_drop_on_empty_board() {
        for shape in ALL {
            let mut board = Board::default();
            let piece = Piece::new(shape);
            assert!(piece.hard_drop(&mut board), "{shape:?}");
            assert!(!board.is_game_over());
            assert_eq!(board.occupied_count(), 4);
            assert!(board.is_occupied(
                piece.cells()[0].col,
                piece.cells()[0].row + piece.drop_distance(&Board::default())
            ));
        }
    }

    #[test]
    fn test_hard_drop_terminates_from_high_above() {
        let mut board = Board::default();
        let piece = Piece::at(Shape::I, 0, -4);
        assert!(piece.hard_drop(&mut board));
        for col in 3..7 {
            assert!(board.is_occupied(col, 19));
        }
    }

    #[test]
    fn test_reset_restores_spawn() {
        let board = Board::default();
        for shape in ALL {
            let mut piece = Piece::at(shape, -2, 10);
            piece.rotate(&board, Direction::Clockwise);
            piece.rotate(&board, Direction::Clockwise);
            piece.move_by(&board, 1, 0);
            piece.reset();
            assert_eq!(piece.orientation(), Orientation::SPAWN, "{shape:?}");
            assert_eq!(
                sorted(piece.cells()),
                sorted(catalog::spawn_cells(shape)),
                "{shape:?}"
            );
        }
    }

    #[test]
    fn test_reset_from_each_orientation() {
        for shape in ALL {
            for i in 1..=4 {
                let o = Orientation::new(i).unwrap();
                let mut piece = Piece::oriented(shape, o, 1, 12);
                piece.reset();
                assert_eq!(piece.cells(), catalog::spawn_cells(shape), "{shape:?} {i}");
            }
        }
    }

    #[test]
    fn test_right_wall() {
        let board = Board::default();
        let mut piece = Piece::new(Shape::I);
        while piece.move_by(&board, 1, 0) {}
        assert_eq!(piece.cells()[3].col, BOARD_WIDTH as i8 - 1);
    }
}
