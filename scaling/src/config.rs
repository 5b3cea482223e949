//! Display configuration with JSON file storage.

use crate::figsize::DEFAULT_FILL_FACTOR;
use crate::histogram::HistogramConfig;
use crate::interval::{IntervalError, Method};
use crate::stretch::{Stretch, StretchError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Stretch(#[from] StretchError),

    #[error("Invalid display setting: {0}")]
    Invalid(String),
}

/// Settings shared by image and video displays.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colour-limit estimation method
    pub interval: Method,
    pub stretch: Stretch,
    /// Clip normalized values to [0, 1]
    pub clip: bool,
    /// Show the colour-bar shades next to the histogram
    pub show_colorbar: bool,
    pub show_histogram: bool,
    pub show_sliders: bool,
    pub histogram: HistogramConfig,
    /// Re-estimate colour limits every N frame updates (0 = never)
    pub clim_every: usize,
    /// Scrolling past the last frame returns to the first
    pub scroll_wrap: bool,
    /// Screen size in inches used to size figures
    pub screen_inches: (f64, f64),
    /// Fraction of the screen a figure may fill
    pub fill_factor: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            interval: Method::Auto,
            stretch: Stretch::linear(),
            clip: true,
            show_colorbar: true,
            show_histogram: true,
            show_sliders: true,
            histogram: HistogramConfig::default(),
            clim_every: 1,
            scroll_wrap: true,
            screen_inches: (13.3, 7.5),
            fill_factor: DEFAULT_FILL_FACTOR,
        }
    }
}

impl DisplayConfig {
    /// Check parameter ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.interval.validate()?;
        self.stretch.validate()?;
        if self.histogram.bins == 0 {
            return Err(ConfigError::Invalid("histogram bins must be > 0".into()));
        }
        if !(self.histogram.range_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "histogram range width must be positive, got {}",
                self.histogram.range_width
            )));
        }
        if !(self.fill_factor > 0.0 && self.fill_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "fill factor must be in (0, 1], got {}",
                self.fill_factor
            )));
        }
        Ok(())
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON file and validate
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::debug!("Loaded display config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Orientation;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.interval, Method::Auto);
        assert_eq!(config.stretch, Stretch::linear());
        assert_eq!(config.clim_every, 1);
        assert!(config.scroll_wrap);
        assert!(config.histogram.log);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("display.json");

        let config = DisplayConfig {
            interval: Method::Percentile {
                lower: 1.0,
                upper: 99.0,
            },
            stretch: Stretch::Asinh { a: 0.2 },
            clim_every: 10,
            histogram: HistogramConfig {
                bins: 30,
                orientation: Orientation::Vertical,
                ..HistogramConfig::default()
            },
            ..DisplayConfig::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = DisplayConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.json");
        std::fs::write(
            &path,
            r#"{"interval": {"method": "min_max"}, "stretch": {"stretch": "sqrt"}, "scroll_wrap": false}"#,
        )
        .unwrap();

        let loaded = DisplayConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.interval, Method::MinMax);
        assert_eq!(loaded.stretch, Stretch::Sqrt);
        assert!(!loaded.scroll_wrap);
        assert_eq!(loaded.clim_every, 1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"interval": {"method": "percentile", "lower": 90.0, "upper": 10.0}}"#,
        )
        .unwrap();
        assert!(matches!(
            DisplayConfig::load_from_file(&path),
            Err(ConfigError::Interval(IntervalError::InvalidPercentile { .. }))
        ));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            DisplayConfig::load_from_file(&path),
            Err(ConfigError::Json(_))
        ));

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            DisplayConfig::load_from_file(&missing),
            Err(ConfigError::Io(_))
        ));
    }
}
