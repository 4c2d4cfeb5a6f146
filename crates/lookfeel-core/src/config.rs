//! Canvas configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunable parameters for viewport navigation and selection handles.
///
/// Every field has a default, so a config file only needs to list the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Lower zoom bound.
    pub min_zoom: f64,
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Zoom level of a freshly created viewport.
    pub initial_zoom: f64,
    /// Exponent applied when magnifying in (or out while below 100%).
    pub zoom_in_exponent: f64,
    /// Exponent applied when magnifying out above 100%.
    pub zoom_out_exponent: f64,
    /// Edge length of the visible handle glyph, in screen pixels.
    pub handle_size: f64,
    /// Edge length of the handle hit region, in screen pixels.
    pub handle_hit_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.05,
            max_zoom: 100.0,
            initial_zoom: 1.0,
            zoom_in_exponent: 1.009,
            zoom_out_exponent: 0.99,
            handle_size: 4.0,
            handle_hit_size: 16.0,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the values describe a usable canvas.
    pub fn validate(&self) -> ConfigResult<()> {
        let values = [
            ("min_zoom", self.min_zoom),
            ("max_zoom", self.max_zoom),
            ("initial_zoom", self.initial_zoom),
            ("zoom_in_exponent", self.zoom_in_exponent),
            ("zoom_out_exponent", self.zoom_out_exponent),
            ("handle_size", self.handle_size),
            ("handle_hit_size", self.handle_hit_size),
        ];
        if let Some((name, value)) = values.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::Invalid(format!("{} must be finite, got {}", name, value)));
        }

        if self.min_zoom <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if self.max_zoom < self.min_zoom {
            return Err(ConfigError::Invalid(format!(
                "max_zoom ({}) is below min_zoom ({})",
                self.max_zoom, self.min_zoom
            )));
        }
        if !(self.min_zoom..=self.max_zoom).contains(&self.initial_zoom) {
            return Err(ConfigError::Invalid(format!(
                "initial_zoom {} is outside [{}, {}]",
                self.initial_zoom, self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_in_exponent <= 0.0 || self.zoom_out_exponent <= 0.0 {
            return Err(ConfigError::Invalid("zoom exponents must be positive".to_string()));
        }
        if self.handle_size <= 0.0 {
            return Err(ConfigError::Invalid("handle_size must be positive".to_string()));
        }
        if self.handle_hit_size < self.handle_size {
            return Err(ConfigError::Invalid(format!(
                "handle_hit_size ({}) is smaller than handle_size ({})",
                self.handle_hit_size, self.handle_size
            )));
        }
        Ok(())
    }
}
