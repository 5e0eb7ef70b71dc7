//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::InputAction`] and tracks
//! the cursor over the selection grid. Nothing here knows about rounds or
//! scoring.

pub mod cursor;
pub mod map;

pub use gap_runner_types as types;

pub use cursor::GridCursor;
pub use map::{handle_key_event, should_quit};
