//! Gap Runner (workspace facade crate).
//!
//! Re-exports the member crates under `gap_runner::{core,input,term,types}`
//! and hosts the command-line definition used by the `gap-runner` binary.

pub mod cli;

pub use gap_runner_core as core;
pub use gap_runner_input as input;
pub use gap_runner_term as term;
pub use gap_runner_types as types;
