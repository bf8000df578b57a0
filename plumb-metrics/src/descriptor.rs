//! Metric descriptors.
//!
//! A metric is either a vector metric, scored over pre-computed embeddings,
//! or a scalar metric, which reads an external signal on its own. Both carry
//! a name and a three-way polarity flag.

use crate::builtin::builtin_vector_metrics;
use async_trait::async_trait;
use plumb_core::{EmbeddingVector, PlumbResult};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// POLARITY
// ============================================================================

/// Declared polarity of a metric.
///
/// `Undeclared` is not the same as `Direct`: a metric set in which every
/// metric is undeclared falls back to the legacy inversion defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    /// No polarity declared
    #[default]
    Undeclared,
    /// Higher value means less coherent
    Inverted,
    /// Higher value means more coherent
    Direct,
}

impl Polarity {
    pub fn is_declared(&self) -> bool {
        !matches!(self, Self::Undeclared)
    }
}

impl From<Option<bool>> for Polarity {
    fn from(inverted: Option<bool>) -> Self {
        match inverted {
            None => Self::Undeclared,
            Some(true) => Self::Inverted,
            Some(false) => Self::Direct,
        }
    }
}

// ============================================================================
// METRIC INPUT
// ============================================================================

/// Embeddings for one measurement, positionally aligned with the state texts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricInput {
    pub goals: Vec<EmbeddingVector>,
    pub context: Vec<EmbeddingVector>,
    pub memories: Vec<EmbeddingVector>,
    pub goal_memories: Vec<EmbeddingVector>,
}

impl MetricInput {
    pub fn new(
        goals: Vec<EmbeddingVector>,
        context: Vec<EmbeddingVector>,
        memories: Vec<EmbeddingVector>,
        goal_memories: Vec<EmbeddingVector>,
    ) -> Self {
        Self {
            goals,
            context,
            memories,
            goal_memories,
        }
    }
}

// ============================================================================
// METRIC TRAITS
// ============================================================================

/// Scoring function over embeddings. Must return a value in [0, 1].
pub trait VectorMetric: Send + Sync {
    fn name(&self) -> &str;

    fn polarity(&self) -> Polarity {
        Polarity::Undeclared
    }

    fn compute(&self, input: &MetricInput) -> f64;
}

/// Scoring function over an external signal. Must return a value in [0, 1].
///
/// Implementations return `Ok(0.0)` when their data source is unavailable;
/// an `Err` fails the whole measurement.
#[async_trait]
pub trait ScalarMetric: Send + Sync {
    fn name(&self) -> &str;

    fn polarity(&self) -> Polarity {
        Polarity::Undeclared
    }

    async fn compute(&self) -> PlumbResult<f64>;
}

/// Vector metric backed by a closure.
pub struct FnVectorMetric<F> {
    name: String,
    polarity: Polarity,
    compute: F,
}

impl<F> FnVectorMetric<F>
where
    F: Fn(&MetricInput) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, polarity: Polarity, compute: F) -> Self {
        Self {
            name: name.into(),
            polarity,
            compute,
        }
    }
}

impl<F> VectorMetric for FnVectorMetric<F>
where
    F: Fn(&MetricInput) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn compute(&self, input: &MetricInput) -> f64 {
        (self.compute)(input)
    }
}

impl<F> fmt::Debug for FnVectorMetric<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnVectorMetric")
            .field("name", &self.name)
            .field("polarity", &self.polarity)
            .finish()
    }
}

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// A metric of either kind.
#[derive(Clone)]
pub enum MetricDescriptor {
    Vector(Arc<dyn VectorMetric>),
    Scalar(Arc<dyn ScalarMetric>),
}

impl MetricDescriptor {
    pub fn name(&self) -> &str {
        match self {
            Self::Vector(m) => m.name(),
            Self::Scalar(m) => m.name(),
        }
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            Self::Vector(m) => m.polarity(),
            Self::Scalar(m) => m.polarity(),
        }
    }
}

impl fmt::Debug for MetricDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Vector(_) => "vector",
            Self::Scalar(_) => "scalar",
        };
        f.debug_struct("MetricDescriptor")
            .field("kind", &kind)
            .field("name", &self.name())
            .field("polarity", &self.polarity())
            .finish()
    }
}

/// The active metrics of a sensor.
#[derive(Clone, Default)]
pub struct MetricSet {
    pub vector: Vec<Arc<dyn VectorMetric>>,
    pub scalar: Vec<Arc<dyn ScalarMetric>>,
}

impl MetricSet {
    pub fn new(vector: Vec<Arc<dyn VectorMetric>>, scalar: Vec<Arc<dyn ScalarMetric>>) -> Self {
        Self { vector, scalar }
    }

    /// The four built-in vector metrics and no scalar metrics.
    pub fn builtin() -> Self {
        Self::new(builtin_vector_metrics(), Vec::new())
    }

    /// Every active metric, vector metrics first.
    pub fn descriptors(&self) -> Vec<MetricDescriptor> {
        self.vector
            .iter()
            .cloned()
            .map(MetricDescriptor::Vector)
            .chain(self.scalar.iter().cloned().map(MetricDescriptor::Scalar))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vector.len() + self.scalar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricSet")
            .field("vector", &self.vector.iter().map(|m| m.name()).collect::<Vec<_>>())
            .field("scalar", &self.scalar.iter().map(|m| m.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plumb_core::{BUILTIN_METRIC_NAMES, GOAL_DRIFT};

    #[test]
    fn test_polarity_from_option() {
        assert_eq!(Polarity::from(None), Polarity::Undeclared);
        assert_eq!(Polarity::from(Some(true)), Polarity::Inverted);
        assert_eq!(Polarity::from(Some(false)), Polarity::Direct);
        assert!(!Polarity::Undeclared.is_declared());
        assert!(Polarity::Direct.is_declared());
    }

    #[test]
    fn test_builtin_set_has_four_vector_metrics() {
        let set = MetricSet::builtin();
        assert_eq!(set.vector.len(), 4);
        assert!(set.scalar.is_empty());
        let names: Vec<_> = set.descriptors().iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, BUILTIN_METRIC_NAMES.to_vec());
    }

    #[test]
    fn test_builtin_sets_are_independent() {
        let mut first = MetricSet::builtin();
        first.vector.clear();
        assert_eq!(MetricSet::builtin().vector.len(), 4);
    }

    #[test]
    fn test_fn_vector_metric() {
        let metric = FnVectorMetric::new(GOAL_DRIFT, Polarity::Direct, |input: &MetricInput| {
            input.goals.len() as f64 / 10.0
        });
        let input = MetricInput::new(
            vec![EmbeddingVector::new(vec![1.0], "m")],
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(metric.name(), GOAL_DRIFT);
        assert_eq!(metric.polarity(), Polarity::Direct);
        assert!((metric.compute(&input) - 0.1).abs() < 1e-12);

        let descriptor = MetricDescriptor::Vector(Arc::new(metric));
        assert_eq!(descriptor.polarity(), Polarity::Direct);
    }
}
