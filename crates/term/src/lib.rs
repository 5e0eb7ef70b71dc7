//! Terminal rendering module.
//!
//! A small, game-oriented rendering layer: [`GameView`] draws a
//! `core::SessionSnapshot` into a [`FrameBuffer`], and [`TerminalRenderer`]
//! flushes frames to the terminal, writing only the cells that changed.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use gap_runner_core as core;
pub use gap_runner_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Layout, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
