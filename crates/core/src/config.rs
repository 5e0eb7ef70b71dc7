//! Game configuration - defaults, then an optional TOML file, then
//! `GAP_RUNNER_*` environment overrides

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{
    Mode, DEFAULT_MAX_LIVES, DEFAULT_POINTS_PER_GAP, DIVERSE_TRAVERSAL_MS, LIVES_CAP,
    PRESENTATION_DELAY_MS, UNIFORM_TRAVERSAL_MS,
};

pub const ENV_PREFIX: &str = "GAP_RUNNER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("environment variable {key} has invalid value {value:?}")]
    Env { key: String, value: String },
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_lives: u8,
    pub points_per_gap: u32,
    pub uniform_traversal_ms: u64,
    pub diverse_traversal_ms: u64,
    pub presentation_delay_ms: u64,
    /// A wrong tap also abandons the round and starts a new one.
    pub forfeit_round_on_miss: bool,
    pub records_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_lives: DEFAULT_MAX_LIVES,
            points_per_gap: DEFAULT_POINTS_PER_GAP,
            uniform_traversal_ms: UNIFORM_TRAVERSAL_MS,
            diverse_traversal_ms: DIVERSE_TRAVERSAL_MS,
            presentation_delay_ms: PRESENTATION_DELAY_MS,
            forfeit_round_on_miss: true,
            records_path: PathBuf::from("gap-runner-records.json"),
            log_path: PathBuf::from("gap-runner.log"),
        }
    }
}

impl GameConfig {
    /// Defaults, overlaid with `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config file loaded");
        Ok(config)
    }

    /// Apply `GAP_RUNNER_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = var("MAX_LIVES") {
            self.max_lives = parse_env(key, value)?;
        }
        if let Some((key, value)) = var("POINTS_PER_GAP") {
            self.points_per_gap = parse_env(key, value)?;
        }
        if let Some((key, value)) = var("UNIFORM_TRAVERSAL_MS") {
            self.uniform_traversal_ms = parse_env(key, value)?;
        }
        if let Some((key, value)) = var("DIVERSE_TRAVERSAL_MS") {
            self.diverse_traversal_ms = parse_env(key, value)?;
        }
        if let Some((key, value)) = var("PRESENTATION_DELAY_MS") {
            self.presentation_delay_ms = parse_env(key, value)?;
        }
        if let Some((key, value)) = var("FORFEIT_ROUND_ON_MISS") {
            self.forfeit_round_on_miss = parse_env(key, value)?;
        }
        if let Some((_, value)) = var("RECORDS_PATH") {
            self.records_path = PathBuf::from(value);
        }
        if let Some((_, value)) = var("LOG_PATH") {
            self.log_path = PathBuf::from(value);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lives == 0 || self.max_lives > LIVES_CAP {
            return Err(ConfigError::Invalid {
                field: "max_lives",
                reason: "must be between 1 and 5",
            });
        }
        if self.uniform_traversal_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "uniform_traversal_ms",
                reason: "must be positive",
            });
        }
        if self.diverse_traversal_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "diverse_traversal_ms",
                reason: "must be positive",
            });
        }
        Ok(())
    }

    /// How long the track takes to cross the screen in `mode`.
    pub fn traversal(&self, mode: Mode) -> Duration {
        match mode {
            Mode::Uniform => Duration::from_millis(self.uniform_traversal_ms),
            Mode::Diverse => Duration::from_millis(self.diverse_traversal_ms),
        }
    }

    pub fn presentation_delay(&self) -> Duration {
        Duration::from_millis(self.presentation_delay_ms)
    }
}

fn parse_env<T: std::str::FromStr>(key: String, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { key, value })
}
