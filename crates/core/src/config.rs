//! Configuration structures for the product-research engine.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Price segmentation configuration.
    pub segment: SegmentConfig,
    /// Raw row normalization configuration.
    pub normalize: NormalizeConfig,
}

impl Config {
    /// Parse a configuration from a JSON string.
    ///
    /// Missing sections and fields fall back to their defaults. The result is
    /// validated before it is returned.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Check that all values are usable by the engine.
    pub fn validate(&self) -> Result<()> {
        self.segment.validate()
    }
}

/// Price segmentation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Width of each price bucket in currency units.
    pub increment_width: f64,
    /// Smallest width offered by the dashboard slider.
    pub slider_min: f64,
    /// Largest width offered by the dashboard slider.
    pub slider_max: f64,
    /// Slider step.
    pub slider_step: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            increment_width: 5.0,
            slider_min: 5.0,
            slider_max: 50.0,
            slider_step: 5.0,
        }
    }
}

impl SegmentConfig {
    /// Validate the segment settings.
    ///
    /// The increment width only needs to be positive; it is not required to
    /// sit on a slider stop.
    pub fn validate(&self) -> Result<()> {
        if !self.increment_width.is_finite() || self.increment_width <= 0.0 {
            return Err(Error::config(format!(
                "increment_width must be a positive number, got {}",
                self.increment_width
            )));
        }
        if !self.slider_step.is_finite() || self.slider_step <= 0.0 {
            return Err(Error::config(format!(
                "slider_step must be a positive number, got {}",
                self.slider_step
            )));
        }
        if !(self.slider_min > 0.0 && self.slider_min <= self.slider_max) {
            return Err(Error::config(format!(
                "slider range [{}, {}] is invalid",
                self.slider_min, self.slider_max
            )));
        }
        Ok(())
    }

    /// Widths offered by the slider, from `slider_min` to `slider_max` inclusive.
    pub fn slider_values(&self) -> Vec<f64> {
        if self.validate().is_err() {
            return Vec::new();
        }
        let stops = ((self.slider_max - self.slider_min) / self.slider_step + 1e-9).floor() as usize;
        (0..=stops)
            .map(|i| self.slider_min + i as f64 * self.slider_step)
            .collect()
    }
}

/// Raw row normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Derive revenue as `price * sales` when a row has no revenue column.
    pub derive_missing_revenue: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            derive_missing_revenue: true,
        }
    }
}
