//! Metric engine: evaluates the active metric set into a snapshot.

use crate::descriptor::{MetricInput, MetricSet, ScalarMetric, VectorMetric};
use futures_util::future::try_join_all;
use plumb_core::{MeasureError, MetricSnapshot, PlumbError, PlumbResult};
use std::sync::Arc;

/// Evaluate vector metrics in order, writing into `snapshot`.
/// Later metrics overwrite earlier ones on a name collision.
pub fn run_vector_metrics(
    metrics: &[Arc<dyn VectorMetric>],
    input: &MetricInput,
    snapshot: &mut MetricSnapshot,
) {
    for metric in metrics {
        let value = metric.compute(input);
        record(snapshot, metric.name(), value);
    }
}

/// Evaluate scalar metrics concurrently, writing into `snapshot` once all
/// have resolved. Any single failure fails the whole call and nothing is
/// written.
pub async fn run_scalar_metrics(
    metrics: &[Arc<dyn ScalarMetric>],
    snapshot: &mut MetricSnapshot,
) -> PlumbResult<()> {
    let values = try_join_all(metrics.iter().map(|metric| async move {
        metric.compute().await.map_err(|e| {
            PlumbError::Measure(MeasureError::ScalarMetric {
                metric: metric.name().to_string(),
                reason: e.to_string(),
            })
        })
    }))
    .await?;

    for (metric, value) in metrics.iter().zip(values) {
        record(snapshot, metric.name(), value);
    }
    Ok(())
}

/// Run the full metric set: vector metrics first, then scalar metrics.
pub async fn evaluate(
    metrics: &MetricSet,
    input: &MetricInput,
    snapshot: &mut MetricSnapshot,
) -> PlumbResult<()> {
    run_vector_metrics(&metrics.vector, input, snapshot);
    run_scalar_metrics(&metrics.scalar, snapshot).await
}

fn record(snapshot: &mut MetricSnapshot, name: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        tracing::warn!(metric = name, value, "Metric returned a value outside [0, 1]");
    }
    snapshot.insert(name, value);
}

// =============================================================================
// TESTS
// =============================================================================
