//! Engine settings and the optional TOML settings file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::universe::Universe;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("window size {0} must be even")]
    OddWindow(usize),

    #[error("window size {0} is too small (minimum 2)")]
    WindowTooSmall(usize),

    #[error("epsilon {0} must be finite and non-negative")]
    BadEpsilon(f64),

    #[error("universe has no tickers")]
    EmptyUniverse,

    #[error("duplicate ticker in universe: {0}")]
    DuplicateTicker(String),

    #[error("category list names unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("ticker {0} is listed as both defensive and cyclical")]
    ConflictingCategory(String),

    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Window and noise-guard settings for classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Trailing sessions per instrument. Split into two equal halves for
    /// structure comparison, so it must be even.
    #[serde(default = "default_window")]
    pub window_size: usize,

    /// Noise guard for direction comparisons. A half-over-half move must
    /// exceed epsilon to count as higher or lower.
    #[serde(default)]
    pub epsilon: f64,
}

fn default_window() -> usize {
    20
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: 20,
            epsilon: 0.0,
        }
    }
}

impl EngineConfig {
    /// Half-window length.
    pub fn half(&self) -> usize {
        self.window_size / 2
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size < 2 {
            return Err(ConfigError::WindowTooSmall(self.window_size));
        }
        if self.window_size % 2 != 0 {
            return Err(ConfigError::OddWindow(self.window_size));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::BadEpsilon(self.epsilon));
        }
        Ok(())
    }
}

/// Full settings as loaded from a TOML file.
///
/// Both sections are optional; missing sections fall back to the defaults
/// (20-session window, zero epsilon, the 11-sector universe).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub universe: Universe,
}

impl Settings {
    /// Load settings from a TOML file and validate them.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.engine.validate()?;
        settings.universe.validate()?;
        Ok(settings)
    }
}
