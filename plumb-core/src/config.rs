//! Sensor configuration.
//!
//! Collaborators (providers, metrics, notifier) are wired in code; this
//! module covers the plain-data part of the configuration that can come
//! from a TOML file or the environment.

use crate::{BandThresholds, ConfigError, MetricWeights, PlumbError, PlumbResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default capacity of the reading history.
pub const DEFAULT_HISTORY_SIZE: usize = 100;

/// Plain-data sensor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorSettings {
    #[serde(default)]
    pub weights: MetricWeights,
    #[serde(default)]
    pub thresholds: BandThresholds,
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_history_size() -> usize {
    DEFAULT_HISTORY_SIZE
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            thresholds: BandThresholds::default(),
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

impl SensorSettings {
    /// Validate the settings.
    /// Returns Ok(()) if valid, Err(PlumbError::Config) if invalid.
    ///
    /// Validates:
    /// - every weight is finite and non-negative
    /// - thresholds are in [0, 1] and strictly descending
    /// - history_size > 0
    pub fn validate(&self) -> PlumbResult<()> {
        self.weights.validate()?;
        self.thresholds.validate()?;
        validate_history_size(self.history_size)
    }

    /// Parse and validate settings from a TOML document.
    pub fn from_toml_str(contents: &str) -> PlumbResult<Self> {
        let settings: SensorSettings = toml::from_str(contents).map_err(|e| {
            PlumbError::Config(ConfigError::Parse {
                reason: e.to_string(),
            })
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate settings from a TOML file.
    pub fn from_path(path: &Path) -> PlumbResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PlumbError::Config(ConfigError::Parse {
                reason: format!("failed to read {}: {}", path.display(), e),
            })
        })?;
        Self::from_toml_str(&contents)
    }

    /// Create settings from environment variables.
    ///
    /// # Environment Variables
    /// - `PLUMB_HISTORY_SIZE`: History capacity (default: 100)
    /// - `PLUMB_BAND_GREEN`: Green band lower bound (default: 0.8)
    /// - `PLUMB_BAND_YELLOW`: Yellow band lower bound (default: 0.6)
    /// - `PLUMB_BAND_ORANGE`: Orange band lower bound (default: 0.4)
    ///
    /// Weights always start from the defaults. Unparsable values fall back
    /// to the default for that field.
    pub fn from_env() -> Self {
        let defaults = BandThresholds::default();
        Self {
            weights: MetricWeights::default(),
            thresholds: BandThresholds {
                green: env_or("PLUMB_BAND_GREEN", defaults.green),
                yellow: env_or("PLUMB_BAND_YELLOW", defaults.yellow),
                orange: env_or("PLUMB_BAND_ORANGE", defaults.orange),
            },
            history_size: env_or("PLUMB_HISTORY_SIZE", DEFAULT_HISTORY_SIZE),
        }
    }
}

/// Validate a history capacity.
pub fn validate_history_size(history_size: usize) -> PlumbResult<()> {
    if history_size == 0 {
        return Err(PlumbError::Config(ConfigError::InvalidValue {
            field: "history_size".to_string(),
            value: history_size.to_string(),
            reason: "history_size must be greater than 0".to_string(),
        }));
    }
    Ok(())
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GOAL_DRIFT;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = SensorSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.history_size, 100);
        assert_eq!(settings.thresholds, BandThresholds::new(0.8, 0.6, 0.4));
    }

    #[test]
    fn test_validate_rejects_zero_history() {
        let settings = SensorSettings {
            history_size: 0,
            ..SensorSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            PlumbError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "history_size"
        ));
    }

    #[test]
    fn test_from_toml_full_document() {
        let toml = r#"
            history_size = 10

            [weights]
            goal-drift = 1.0
            latency = 0.5

            [thresholds]
            green = 0.9
            yellow = 0.7
            orange = 0.5
        "#;
        let settings = SensorSettings::from_toml_str(toml).unwrap();
        assert_eq!(settings.history_size, 10);
        assert_eq!(settings.weights.weight(GOAL_DRIFT), 1.0);
        assert_eq!(settings.weights.weight("latency"), 0.5);
        assert_eq!(settings.weights.weight("memory-retention"), 0.0);
        assert_eq!(settings.thresholds.green, 0.9);
    }

    #[test]
    fn test_from_toml_missing_sections_use_defaults() {
        let settings = SensorSettings::from_toml_str("history_size = 5").unwrap();
        assert_eq!(settings.history_size, 5);
        assert_eq!(settings.weights, MetricWeights::default());
        assert_eq!(settings.thresholds, BandThresholds::default());
    }

    #[test]
    fn test_from_toml_rejects_unknown_fields() {
        let err = SensorSettings::from_toml_str("unknown = 1").unwrap_err();
        assert!(matches!(err, PlumbError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_from_toml_validates_thresholds() {
        let toml = r#"
            [thresholds]
            green = 0.4
            yellow = 0.6
            orange = 0.8
        "#;
        let err = SensorSettings::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, PlumbError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SensorSettings::from_path(Path::new("/nonexistent/plumb.toml")).unwrap_err();
        assert!(matches!(err, PlumbError::Config(ConfigError::Parse { .. })));
    }

    // Only test touching PLUMB_* variables, so parallel tests cannot race on them.
    #[test]
    fn test_from_env_overlays_and_falls_back() {
        std::env::set_var("PLUMB_HISTORY_SIZE", "37");
        std::env::set_var("PLUMB_BAND_GREEN", "not-a-number");
        std::env::set_var("PLUMB_BAND_ORANGE", "0.25");

        let settings = SensorSettings::from_env();

        std::env::remove_var("PLUMB_HISTORY_SIZE");
        std::env::remove_var("PLUMB_BAND_GREEN");
        std::env::remove_var("PLUMB_BAND_ORANGE");

        assert_eq!(settings.history_size, 37);
        assert_eq!(settings.thresholds.green, 0.8);
        assert_eq!(settings.thresholds.yellow, 0.6);
        assert_eq!(settings.thresholds.orange, 0.25);
        assert_eq!(settings.weights, MetricWeights::default());
        assert!(settings.validate().is_ok());
    }
}
