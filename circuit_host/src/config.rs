//! Host configuration
//!
//! A versioned JSON document. Missing fields take their defaults, so a
//! config file only needs the values it changes.

use crate::bindings::KeyBindings;
use circuit_editor::{DEFAULT_FRAME_BUDGET_MICROS, SPEED_SCALE};
use circuit_types::GridSize;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid speed range: min {min} is above max {max}")]
    InvalidSpeedRange { min: i32, max: i32 },

    #[error("Invalid grid size {width}x{height}")]
    InvalidGridSize { width: usize, height: usize },
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Version of the config format
    pub version: u32,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Speed at startup, clamped to the speed range
    pub initial_speed: i32,
    /// Fastest speed reachable with the speed keys
    pub min_speed: i32,
    /// Slowest speed reachable with the speed keys
    pub max_speed: i32,
    /// Wall-clock time one frame may spend ticking
    pub frame_budget_micros: u64,
    pub key_bindings: KeyBindings,
}

impl HostConfig {
    /// Current version of the config format
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            grid_width: 16,
            grid_height: 16,
            initial_speed: 0,
            min_speed: -SPEED_SCALE,
            max_speed: 60,
            frame_budget_micros: DEFAULT_FRAME_BUDGET_MICROS,
            key_bindings: KeyBindings::default(),
        }
    }

    /// Parses and validates a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: HostConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != Self::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        if self.min_speed > self.max_speed {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if !self.grid_size().is_valid() {
            return Err(ConfigError::InvalidGridSize {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        Ok(())
    }

    pub fn grid_size(&self) -> GridSize {
        GridSize::new(self.grid_width, self.grid_height)
    }

    /// Clamps a speed into the configured range
    pub fn clamp_speed(&self, speed: i32) -> i32 {
        speed.clamp(self.min_speed, self.max_speed.max(self.min_speed))
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new()
    }
}
