//! Quadtris (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary, the
//! integration tests and the benches can write `quadtris::core::Session`.

pub use quadtris_core as core;
pub use quadtris_input as input;
pub use quadtris_term as term;
pub use quadtris_types as types;
