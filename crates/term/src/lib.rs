//! Terminal renderer for the simulation core.
//!
//! Renders into a simple framebuffer that is diffed and flushed to the
//! terminal, two columns per board cell. The renderer only reads
//! [`core::GameSnapshot`]s; it never takes part in rule decisions.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use quadtris_core as core;
pub use quadtris_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{Decor, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
