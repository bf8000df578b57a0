//! Weighted aggregation of a metric snapshot into one coherence index.

use crate::polarity::InvertedSet;
use plumb_core::vector::clamp01;
use plumb_core::{MetricSnapshot, MetricWeights};

/// Index returned when no weighted metric is present in the snapshot.
pub const UNMEASURED_INDEX: f64 = 1.0;

/// Contribution of one value after polarity is applied.
pub fn contribution(value: f64, inverted: bool) -> f64 {
    if inverted {
        1.0 - value
    } else {
        value
    }
}

/// Weighted average of the snapshot, in [0, 1]; 1 is fully coherent.
///
/// Metrics with zero weight, or without a snapshot entry, are skipped. When
/// nothing remains the index is `UNMEASURED_INDEX`. Weights are divided by
/// the largest one before summing, so very large weights cannot overflow.
pub fn aggregate(snapshot: &MetricSnapshot, weights: &MetricWeights, inverted: &InvertedSet) -> f64 {
    let measured: Vec<(f64, f64)> = weights
        .iter()
        .filter(|(_, weight)| *weight != 0.0)
        .filter_map(|(name, weight)| {
            snapshot
                .get(name)
                .map(|value| (contribution(value, inverted.contains(name)), weight))
        })
        .collect();

    let max_weight = measured
        .iter()
        .map(|(_, weight)| weight.abs())
        .fold(0.0, f64::max);
    if max_weight == 0.0 {
        return UNMEASURED_INDEX;
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (value, weight) in measured {
        let weight = weight / max_weight;
        weighted_sum += value * weight;
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return UNMEASURED_INDEX;
    }
    clamp01(weighted_sum / total_weight)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use plumb_core::{
        CONTRADICTION_PRESSURE, GOAL_DRIFT, MEMORY_RETENTION, SEMANTIC_DIFFUSION,
    };

    fn none() -> InvertedSet {
        InvertedSet::declared(Vec::<String>::new())
    }

    #[test]
    fn test_all_zero_builtins_legacy_is_three_quarters() {
        let index = aggregate(
            &MetricSnapshot::seeded(),
            &MetricWeights::default(),
            &InvertedSet::legacy(),
        );
        assert!((index - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_no_weights_is_coherent() {
        let snapshot: MetricSnapshot = [("a", 0.1)].into_iter().collect();
        assert_eq!(aggregate(&snapshot, &MetricWeights::empty(), &none()), 1.0);
    }

    #[test]
    fn test_weighted_metric_missing_from_snapshot_is_skipped() {
        let snapshot: MetricSnapshot = [("a", 0.4)].into_iter().collect();
        let weights = MetricWeights::empty().with("a", 1.0).with("b", 5.0);
        assert!((aggregate(&snapshot, &weights, &none()) - 0.4).abs() < 1e-12);

        let only_missing = MetricWeights::empty().with("b", 5.0);
        assert_eq!(aggregate(&snapshot, &only_missing, &none()), 1.0);
    }

    #[test]
    fn test_zero_weight_is_skipped() {
        let snapshot: MetricSnapshot = [("a", 0.4), ("b", 0.9)].into_iter().collect();
        let weights = MetricWeights::empty().with("a", 1.0).with("b", 0.0);
        assert!((aggregate(&snapshot, &weights, &none()) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_declared_goal_drift_direct_versus_legacy_inverted() {
        let snapshot: MetricSnapshot = [(GOAL_DRIFT, 0.8)].into_iter().collect();
        let weights = MetricWeights::empty().with(GOAL_DRIFT, 1.0);

        let declared = aggregate(&snapshot, &weights, &none());
        assert!((declared - 0.8).abs() < 1e-12);

        let legacy = aggregate(&snapshot, &weights, &InvertedSet::legacy());
        assert!((legacy - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_weights_scale_invariant_example() {
        let snapshot: MetricSnapshot = [("a", 0.2), ("b", 0.9)].into_iter().collect();
        let w1 = MetricWeights::empty().with("a", 0.3).with("b", 0.7);
        let w2 = MetricWeights::empty().with("a", 0.6).with("b", 1.4);
        let i1 = aggregate(&snapshot, &w1, &none());
        let i2 = aggregate(&snapshot, &w2, &none());
        assert!((i1 - i2).abs() < 1e-9);
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let snapshot: MetricSnapshot = [("a", 0.5), ("b", 1.0)].into_iter().collect();
        let small = MetricWeights::empty().with("a", 1.0).with("b", 1.0);
        let huge = small.scaled(1e308);
        assert!(huge.validate().is_ok());

        let small_index = aggregate(&snapshot, &small, &none());
        let huge_index = aggregate(&snapshot, &huge, &none());
        assert!((small_index - 0.75).abs() < 1e-12);
        assert!((small_index - huge_index).abs() < 1e-12);
    }

    #[test]
    fn test_legacy_mix() {
        let snapshot: MetricSnapshot = [
            (GOAL_DRIFT, 0.2),
            (MEMORY_RETENTION, 0.6),
            (CONTRADICTION_PRESSURE, 0.0),
            (SEMANTIC_DIFFUSION, 0.4),
        ]
        .into_iter()
        .collect();
        // (0.8 + 0.6 + 1.0 + 0.6) / 4
        let index = aggregate(&snapshot, &MetricWeights::default(), &InvertedSet::legacy());
        assert!((index - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_metric_still_clamps_index() {
        let snapshot: MetricSnapshot = [("a", 3.0)].into_iter().collect();
        let weights = MetricWeights::empty().with("a", 1.0);
        assert_eq!(aggregate(&snapshot, &weights, &none()), 1.0);

        let inverted = InvertedSet::declared(["a"]);
        assert_eq!(aggregate(&snapshot, &weights, &inverted), 0.0);
    }
}

// =============================================================================
// PROPERTY-BASED TESTS
// =============================================================================
