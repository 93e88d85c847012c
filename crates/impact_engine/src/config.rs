//! Simulation configuration
//!
//! Strongly typed configuration for the physics core and the fixed-step
//! driver, loadable from TOML. Every field has a default matching the
//! engine's stock tunables, so a partial (or empty) file is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunables applied to newly created physical bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration along -Y.
    pub gravity: f32,
    /// Energy retention in collisions, expected in [0, 1].
    pub collide_restitution: f32,
    /// Velocity damping fraction, expected in [0, 1).
    pub moving_resistance: f32,
    /// Optional component-wise velocity clamp.
    pub max_velocity: Option<[f32; 3]>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 10.0,
            collide_restitution: 0.8,
            moving_resistance: 0.075,
            max_velocity: None,
        }
    }
}

/// Configuration for the fixed-timestep simulation driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds simulated by one scene tick.
    pub fixed_timestep: f32,
    /// Upper bound on ticks run per `advance` call before time is dropped.
    pub max_steps_per_frame: u32,
    /// Body tunables.
    pub physics: PhysicsConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 8,
            physics: PhysicsConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep must be a positive number, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "max_steps_per_frame must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config text is not valid TOML for the expected schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but violates an invariant
    #[error("invalid config value: {0}")]
    Invalid(String),
}
