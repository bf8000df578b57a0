//! Metric snapshots, weights and coherence readings.

use crate::{Band, ConfigError, PlumbError, PlumbResult, Tick, Timestamp};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// BUILT-IN METRIC NAMES
// ============================================================================

pub const GOAL_DRIFT: &str = "goal-drift";
pub const MEMORY_RETENTION: &str = "memory-retention";
pub const CONTRADICTION_PRESSURE: &str = "contradiction-pressure";
pub const SEMANTIC_DIFFUSION: &str = "semantic-diffusion";

/// Names of the four built-in metrics, in evaluation order.
pub const BUILTIN_METRIC_NAMES: [&str; 4] = [
    GOAL_DRIFT,
    MEMORY_RETENTION,
    CONTRADICTION_PRESSURE,
    SEMANTIC_DIFFUSION,
];

// ============================================================================
// METRIC SNAPSHOT
// ============================================================================

/// Insertion-ordered mapping from metric name to raw value.
///
/// Re-inserting an existing name overwrites the value in place, so the
/// last write wins while the first position is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSnapshot {
    entries: Vec<(String, f64)>,
}

impl MetricSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with every built-in metric seeded at 0.
    pub fn seeded() -> Self {
        let mut snapshot = Self::new();
        for name in BUILTIN_METRIC_NAMES {
            snapshot.insert(name, 0.0);
        }
        snapshot
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for MetricSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (name, value) in iter {
            snapshot.insert(name, value);
        }
        snapshot
    }
}

impl Serialize for MetricSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MetricSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = MetricSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of metric names to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut snapshot = MetricSnapshot::new();
                while let Some((name, value)) = access.next_entry::<String, f64>()? {
                    snapshot.insert(name, value);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

// ============================================================================
// METRIC WEIGHTS
// ============================================================================

/// Aggregation weight per metric name. Absent names weigh 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricWeights {
    weights: BTreeMap<String, f64>,
}

impl Default for MetricWeights {
    /// Equal 0.25 weight across the four built-in metrics.
    fn default() -> Self {
        Self::equal(BUILTIN_METRIC_NAMES)
    }
}

impl MetricWeights {
    /// No weights; every metric is excluded from aggregation.
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Equal weights summing to 1 across `names`.
    pub fn equal<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let share = if names.is_empty() {
            0.0
        } else {
            1.0 / names.len() as f64
        };
        Self {
            weights: names.into_iter().map(|n| (n, share)).collect(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, weight: f64) -> Self {
        self.set(name, weight);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, weight: f64) {
        self.weights.insert(name.into(), weight);
    }

    /// Weight for `name`, 0 when absent.
    pub fn weight(&self, name: &str) -> f64 {
        self.weights.get(name).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(n, w)| (n.as_str(), *w))
    }

    /// Multiply every weight by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            weights: self
                .weights
                .iter()
                .map(|(n, w)| (n.clone(), w * factor))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Validate that every weight is finite and non-negative.
    pub fn validate(&self) -> PlumbResult<()> {
        for (name, weight) in &self.weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(PlumbError::Config(ConfigError::InvalidValue {
                    field: format!("weights.{}", name),
                    value: weight.to_string(),
                    reason: "weight must be a finite, non-negative number".to_string(),
                }));
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for MetricWeights {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().map(|(n, w)| (n.into(), w)).collect(),
        }
    }
}

// ============================================================================
// COHERENCE READING
// ============================================================================

/// One completed measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceReading {
    /// Timestamp of the tick that triggered the measurement
    pub timestamp: Timestamp,
    /// Sequence number of the triggering tick
    pub tick_sequence: u64,
    /// Raw metric values
    pub metrics: MetricSnapshot,
    /// Aggregate score in [0, 1]; 1 is fully coherent
    pub coherence_index: f64,
    /// Severity band of `coherence_index`
    pub band: Band,
}

impl CoherenceReading {
    pub fn new(tick: &Tick, metrics: MetricSnapshot, coherence_index: f64, band: Band) -> Self {
        Self {
            timestamp: tick.timestamp,
            tick_sequence: tick.sequence,
            metrics,
            coherence_index,
            band,
        }
    }

    /// Raw value of one metric in this reading.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name)
    }
}

// =============================================================================
// TESTS
// =============================================================================
