//! PLUMB Metrics - Scoring and Aggregation
//!
//! Metric descriptors (vector and scalar), the four built-in metrics, the
//! metric engine, polarity resolution and weighted aggregation.

pub mod aggregate;
pub mod builtin;
mod descriptor;
pub mod engine;
pub mod polarity;

pub use aggregate::{aggregate, contribution, UNMEASURED_INDEX};
pub use builtin::{
    builtin_vector_metrics, ContradictionPressure, GoalDrift, MemoryRetention, SemanticDiffusion,
};
pub use descriptor::{
    FnVectorMetric, MetricDescriptor, MetricInput, MetricSet, Polarity, ScalarMetric, VectorMetric,
};
pub use engine::evaluate;
pub use polarity::{resolve_inverted, InvertedSet, PolarityMode, LEGACY_INVERTED};
