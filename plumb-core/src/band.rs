//! Severity bands and threshold classification.

use crate::{ConfigError, PlumbError, PlumbResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default lower bound of the green band.
pub const DEFAULT_GREEN_THRESHOLD: f64 = 0.8;
/// Default lower bound of the yellow band.
pub const DEFAULT_YELLOW_THRESHOLD: f64 = 0.6;
/// Default lower bound of the orange band.
pub const DEFAULT_ORANGE_THRESHOLD: f64 = 0.4;

/// Ordered severity band, best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Green,
    Yellow,
    Orange,
    Red,
}

impl Band {
    /// Numeric rank; higher is better (Red = 0, Green = 3).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Orange => 1,
            Self::Yellow => 2,
            Self::Green => 3,
        }
    }

    pub fn is_worse_than(&self, other: Band) -> bool {
        self.rank() < other.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing Band from string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandParseError(pub String);

impl fmt::Display for BandParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid band: {}", self.0)
    }
}

impl std::error::Error for BandParseError {}

impl FromStr for Band {
    type Err = BandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "orange" => Ok(Self::Orange),
            "red" => Ok(Self::Red),
            _ => Err(BandParseError(s.to_string())),
        }
    }
}

/// Lower bounds of the green, yellow and orange bands.
/// Anything below `orange` is red.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandThresholds {
    pub green: f64,
    pub yellow: f64,
    pub orange: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            green: DEFAULT_GREEN_THRESHOLD,
            yellow: DEFAULT_YELLOW_THRESHOLD,
            orange: DEFAULT_ORANGE_THRESHOLD,
        }
    }
}

impl BandThresholds {
    pub fn new(green: f64, yellow: f64, orange: f64) -> Self {
        Self {
            green,
            yellow,
            orange,
        }
    }

    /// Map a coherence index onto a band.
    pub fn classify(&self, index: f64) -> Band {
        if index >= self.green {
            Band::Green
        } else if index >= self.yellow {
            Band::Yellow
        } else if index >= self.orange {
            Band::Orange
        } else {
            Band::Red
        }
    }

    /// Validate the thresholds.
    ///
    /// Validates:
    /// - every cut point is finite and within [0, 1]
    /// - green > yellow > orange
    pub fn validate(&self) -> PlumbResult<()> {
        for (field, value) in [
            ("thresholds.green", self.green),
            ("thresholds.yellow", self.yellow),
            ("thresholds.orange", self.orange),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, value, "must be between 0.0 and 1.0"));
            }
        }

        if self.green <= self.yellow {
            return Err(invalid(
                "thresholds.green",
                self.green,
                "must be greater than thresholds.yellow",
            ));
        }
        if self.yellow <= self.orange {
            return Err(invalid(
                "thresholds.yellow",
                self.yellow,
                "must be greater than thresholds.orange",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: f64, reason: &str) -> PlumbError {
    PlumbError::Config(ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    })
}

/// Classify `index` against `thresholds`.
pub fn classify_band(index: f64, thresholds: &BandThresholds) -> Band {
    thresholds.classify(index)
}

// =============================================================================
// TESTS
// =============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// For a <= b, band(a) is never better than band(b).
        #[test]
        fn prop_classify_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let t = BandThresholds::default();
            prop_assert!(t.classify(lo).rank() <= t.classify(hi).rank());
        }
    }
}
