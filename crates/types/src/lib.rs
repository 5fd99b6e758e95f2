//! Shared vocabulary for the simulation core, the input layer and the renderer.
//!
//! Everything here is plain data with no dependencies, so the same types can be
//! used by `quadtris-core`, by the key mapper and by the terminal view.
//!
//! # Coordinates
//!
//! A board position is `(col, row)`:
//!
//! - **col**: 0..=9, left to right
//! - **row**: 0..=19, top to bottom
//!
//! Rows above the visible field are negative. A falling piece may sit there,
//! deposited cells never do.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval (~60 FPS) |
//! | `LOCK_DELAY_MS` | 500 | Grace period once a piece rests |
//! | `LINE_FLASH_MS` | 100 | Per-row flash before a clear (renderer) |
//! | `DRAIN_STEP_MS` | 100 | Per-row drain after game over (renderer) |
//!
//! # Examples
//!
//! ```
//! use quadtris_types::{Direction, GameAction, Orientation, Shape, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(Shape::from_str("t"), Some(Shape::T));
//! assert_eq!(Orientation::SPAWN.step(Direction::Clockwise).index(), 2);
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Grace period between a piece coming to rest and being deposited.
pub const LOCK_DELAY_MS: u32 = 500;

/// How long the orchestrator flashes each cleared row.
pub const LINE_FLASH_MS: u32 = 100;

/// How long the orchestrator waits between drained rows after game over.
pub const DRAIN_STEP_MS: u32 = 100;

/// Default number of upcoming shapes shown in the preview.
pub const DEFAULT_PREVIEW_LEN: usize = 5;

/// Upper bound on the preview: the queue never holds fewer entries after a pop.
pub const MAX_PREVIEW_LEN: usize = 7;

/// Points per cleared line before squaring: `lines^2 * LINE_CLEAR_POINTS`.
pub const LINE_CLEAR_POINTS: u32 = 100;

/// A piece being reset for hold is lifted until every cell is above this row.
pub const RESET_CLEARANCE_ROW: i8 = -3;

/// Hard drop never travels further than this (board height plus a piece span).
pub const MAX_DROP_DISTANCE: i8 = BOARD_HEIGHT as i8 + 4;

/// The seven piece shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Shape {
    /// Every shape, in the order a fresh bag is assembled before shuffling.
    pub const BAG: [Shape; 7] = [
        Shape::S,
        Shape::Z,
        Shape::J,
        Shape::L,
        Shape::T,
        Shape::O,
        Shape::I,
    ];

    /// Parse shape from string (case-insensitive)
    ///
    /// ```
    /// use quadtris_types::Shape;
    ///
    /// assert_eq!(Shape::from_str("i"), Some(Shape::I));
    /// assert_eq!(Shape::from_str("J"), Some(Shape::J));
    /// assert_eq!(Shape::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(Shape::I),
            "o" => Some(Shape::O),
            "t" => Some(Shape::T),
            "s" => Some(Shape::S),
            "z" => Some(Shape::Z),
            "j" => Some(Shape::J),
            "l" => Some(Shape::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::I => "i",
            Shape::O => "o",
            Shape::T => "t",
            Shape::S => "s",
            Shape::Z => "z",
            Shape::J => "j",
            Shape::L => "l",
        }
    }
}

/// Display color tag carried by every piece and deposited cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Cyan,
    Yellow,
    Purple,
    LightGreen,
    Red,
    Blue,
    Orange,
}

impl Color {
    /// 24-bit RGB value used by terminal renderers.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Cyan => (0, 255, 255),
            Color::Yellow => (255, 255, 0),
            Color::Purple => (160, 32, 240),
            Color::LightGreen => (144, 238, 144),
            Color::Red => (255, 0, 0),
            Color::Blue => (0, 0, 255),
            Color::Orange => (255, 165, 0),
        }
    }
}

/// Rotation direction. Clockwise is `+1`, counter-clockwise `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Map a signed direction onto the enum. Zero is not a direction.
    ///
    /// ```
    /// use quadtris_types::Direction;
    ///
    /// assert_eq!(Direction::from_sign(1), Some(Direction::Clockwise));
    /// assert_eq!(Direction::from_sign(-3), Some(Direction::CounterClockwise));
    /// assert_eq!(Direction::from_sign(0), None);
    /// ```
    pub fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            s if s > 0 => Some(Direction::Clockwise),
            s if s < 0 => Some(Direction::CounterClockwise),
            _ => None,
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Orientation index in `1..=4`. Stepping wraps 4 → 1 and 1 → 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation(u8);

impl Orientation {
    /// Orientation every piece spawns in.
    pub const SPAWN: Orientation = Orientation(1);

    pub fn new(index: u8) -> Option<Self> {
        (1..=4).contains(&index).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Next index in the 1→2→3→4→1 cycle.
    pub fn next(self) -> Self {
        Self(self.0 % 4 + 1)
    }

    /// Previous index in the cycle.
    pub fn prev(self) -> Self {
        Self((self.0 + 2) % 4 + 1)
    }

    /// `next` for clockwise, `prev` for counter-clockwise.
    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Clockwise => self.next(),
            Direction::CounterClockwise => self.prev(),
        }
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::SPAWN
    }
}

/// A board position. Rows may be negative above the visible field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub col: i8,
    pub row: i8,
}

impl Pos {
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    pub const fn offset(self, dcol: i8, drow: i8) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }

    /// `offset`, or `None` when either coordinate leaves the `i8` range.
    pub fn checked_offset(self, dcol: i8, drow: i8) -> Option<Self> {
        Some(Self {
            col: self.col.checked_add(dcol)?,
            row: self.row.checked_add(drow)?,
        })
    }
}

/// A cell on the board: `None` when empty, otherwise the shape that filled it.
pub type Cell = Option<Shape>;

/// Commands the orchestrator can deliver to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    SoftDrop,
    /// Drop to the lowest reachable row and deposit immediately
    HardDrop,
    /// Rotate clockwise
    RotateCw,
    /// Rotate counter-clockwise
    RotateCcw,
    /// Swap with the held piece (once per piece)
    Hold,
    /// Toggle the paused modal
    Pause,
    /// Start a new game
    Restart,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use quadtris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("ROTATECCW"), Some(GameAction::RotateCcw));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}
