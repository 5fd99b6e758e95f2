use arrayvec::ArrayVec;

use crate::piece::Piece;
use crate::types::{Cell, Orientation, Pos, Shape, BOARD_HEIGHT, BOARD_WIDTH, MAX_PREVIEW_LEN};

pub type Grid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub shape: Shape,
    pub orientation: Orientation,
    pub cells: [Pos; 4],
    pub ghost: [Pos; 4],
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            shape: value.shape(),
            orientation: value.orientation(),
            cells: value.cells(),
            ghost: value.ghost(),
        }
    }
}

/// Everything a renderer needs for one frame, owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: Grid,
    pub active: Option<ActiveSnapshot>,
    pub held: Option<Shape>,
    pub can_hold: bool,
    pub preview: ArrayVec<Shape, MAX_PREVIEW_LEN>,
    pub paused: bool,
    pub game_over: bool,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub ticks_per_fall: u32,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    pub fn cell(&self, col: i8, row: i8) -> Option<Cell> {
        if col < 0 || row < 0 {
            return None;
        }
        self.board
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            held: None,
            can_hold: true,
            preview: ArrayVec::new(),
            paused: false,
            game_over: false,
            score: 0,
            lines: 0,
            level: 1,
            ticks_per_fall: 0,
            seed: 0,
        }
    }
}
