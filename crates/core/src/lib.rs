//! Quadtris simulation core - pure, deterministic, and testable
//!
//! The authoritative model of the playing field: the board, the falling
//! piece, its per-shape rotation rules, line clearing, the supply queue and
//! the session state machine that drives gravity and lock delay. No I/O,
//! no threads, no clocks: the orchestrator calls [`Session::tick`] once per
//! frame and renders from [`Session::snapshot`].
//!
//! # Module Structure
//!
//! - [`catalog`]: spawn cells, colors and the per-shape rotation tables
//! - [`board`]: 10x20 grid, collision, deposit, line clearing, hold slot
//! - [`piece`]: movement, rotation, hard drop, ghost projection, reset
//! - [`rng`]: seeded LCG and the 7-bag supply queue
//! - [`session`]: gravity, lock delay, levels, pause, game over
//! - [`config`]: JSON-loadable tuning and the level table
//! - [`snapshot`]: owned per-frame view for renderers
//!
//! # Game Rules
//!
//! - **Bag randomizer**: each run of seven pieces holds every shape once
//! - **Fixed rotations**: one hardcoded transition per shape, orientation and
//!   direction, no kick search. If the probe cells are blocked the rotation
//!   is refused
//! - **Open ceiling**: rows above the field never block
//! - **Lock delay**: 500ms after a piece comes to rest, cancelled by falling
//! - **Hold**: once per piece
//! - **Scoring**: `lines^2 * 100` per clear
//! - **Game over**: a deposit above the field or onto an occupied cell
//!
//! # Example
//!
//! ```
//! use quadtris_core::Session;
//! use quadtris_types::GameAction;
//!
//! let mut game = Session::new(12345);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.board().occupied_count(), 4);
//! assert!(game.take_last_event().is_some());
//! ```

pub mod board;
pub mod catalog;
pub mod config;
pub mod piece;
pub mod rng;
pub mod session;
pub mod snapshot;

pub use quadtris_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LineClear};
pub use config::{ConfigError, LevelEntry, SessionConfig};
pub use piece::Piece;
pub use rng::{SimpleRng, SupplyQueue};
pub use session::{LockEvent, Mode, Phase, Session};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
