//! Session tuning: lock delay, frame interval, preview length and the level table.
//!
//! Loaded from JSON. Every field is optional and falls back to the default tuning.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{DEFAULT_PREVIEW_LEN, LOCK_DELAY_MS, MAX_PREVIEW_LEN, TICK_MS};

/// One row of the level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    pub level: u32,
    /// Frames between gravity steps.
    pub ticks_per_fall: u32,
    /// Cumulative cleared lines needed to reach this level.
    pub lines_required: u32,
}

impl LevelEntry {
    pub const fn new(level: u32, ticks_per_fall: u32, lines_required: u32) -> Self {
        Self {
            level,
            ticks_per_fall,
            lines_required,
        }
    }
}

/// Default level table: (level, ticks per fall, lines required).
pub const DEFAULT_LEVELS: [LevelEntry; 12] = [
    LevelEntry::new(1, 60, 0),
    LevelEntry::new(2, 50, 10),
    LevelEntry::new(3, 40, 20),
    LevelEntry::new(4, 30, 30),
    LevelEntry::new(5, 25, 40),
    LevelEntry::new(6, 20, 50),
    LevelEntry::new(7, 15, 60),
    LevelEntry::new(8, 10, 70),
    LevelEntry::new(9, 5, 80),
    LevelEntry::new(10, 3, 90),
    LevelEntry::new(11, 2, 100),
    LevelEntry::new(12, 1, 110),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level table is empty")]
    EmptyLevels,
    #[error("first level must require 0 lines, got {0}")]
    FirstLevelRequiresLines(u32),
    #[error("level {level} has ticks_per_fall = 0")]
    ZeroTicksPerFall { level: u32 },
    #[error("level {level} requires {lines} lines, not more than the level before it")]
    NonIncreasingThreshold { level: u32, lines: u32 },
    #[error("preview_len must be in 1..={max}, got {got}")]
    PreviewLen { got: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Grace period once the piece rests, in milliseconds.
    pub lock_delay_ms: u32,
    /// Frame interval the orchestrator drives `tick` at.
    pub frame_ms: u32,
    /// Number of upcoming shapes shown.
    pub preview_len: usize,
    pub levels: Vec<LevelEntry>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lock_delay_ms: LOCK_DELAY_MS,
            frame_ms: TICK_MS,
            preview_len: DEFAULT_PREVIEW_LEN,
            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let first = self.levels.first().ok_or(ConfigError::EmptyLevels)?;
        if first.lines_required != 0 {
            return Err(ConfigError::FirstLevelRequiresLines(first.lines_required));
        }
        for entry in &self.levels {
            if entry.ticks_per_fall == 0 {
                return Err(ConfigError::ZeroTicksPerFall { level: entry.level });
            }
        }
        for pair in self.levels.windows(2) {
            if pair[1].lines_required <= pair[0].lines_required {
                return Err(ConfigError::NonIncreasingThreshold {
                    level: pair[1].level,
                    lines: pair[1].lines_required,
                });
            }
        }
        if !(1..=MAX_PREVIEW_LEN).contains(&self.preview_len) {
            return Err(ConfigError::PreviewLen {
                got: self.preview_len,
                max: MAX_PREVIEW_LEN,
            });
        }
        Ok(())
    }
}
