//! Command-line interface for gap-runner.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::Mode;

/// Gap Runner - fill the gaps before the track scrolls away
#[derive(Parser, Debug)]
#[command(name = "gap-runner")]
#[command(about = "Terminal tile arcade: fill the gaps in scrolling sequences", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML config file (GAP_RUNNER_* environment variables override it)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run; defaults to `play`
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The subcommand, with a bare invocation meaning `play`.
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Play(PlayArgs::default()))
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play in the terminal
    Play(PlayArgs),

    /// Inspect or remove saved session records
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayArgs {
    /// Round style
    #[arg(long, value_enum, default_value_t = ModeArg::Uniform)]
    pub mode: ModeArg,

    /// Seed for reproducible rounds
    #[arg(long)]
    pub seed: Option<u32>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RecordsAction {
    /// List records, most recent first
    List,

    /// Delete one record by id
    Delete {
        /// Record id (UUID)
        id: String,
    },

    /// Delete every record
    Clear,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModeArg {
    /// One family per round, 3×3 pool
    #[default]
    Uniform,
    /// Mixed families, 5×6 pool
    Diverse,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Uniform => Mode::Uniform,
            ModeArg::Diverse => Mode::Diverse,
        }
    }
}
