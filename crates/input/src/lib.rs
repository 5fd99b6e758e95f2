//! Terminal input mapping.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Pausing,
//! quitting and the instructions screen are decided by the orchestrator; this
//! crate only translates keys.

pub mod map;

pub use quadtris_types as types;

pub use map::{handle_key_event, should_quit, CONTROLS};
