//! The four built-in vector metrics.
//!
//! Built-ins leave their polarity undeclared, so a sensor running only
//! built-ins aggregates in legacy mode. Each returns 0 when an input list
//! it needs is empty.

use crate::descriptor::{MetricInput, VectorMetric};
use plumb_core::vector::{centroid, clamp01, cosine_similarity, mean};
use plumb_core::{
    EmbeddingVector, CONTRADICTION_PRESSURE, GOAL_DRIFT, MEMORY_RETENTION, SEMANTIC_DIFFUSION,
};
use std::sync::Arc;

/// Fresh list of the built-in metrics, in evaluation order.
pub fn builtin_vector_metrics() -> Vec<Arc<dyn VectorMetric>> {
    vec![
        Arc::new(GoalDrift),
        Arc::new(MemoryRetention),
        Arc::new(ContradictionPressure),
        Arc::new(SemanticDiffusion),
    ]
}

/// Best similarity of `v` to any candidate, clamped to [0, 1].
fn best_match(v: &EmbeddingVector, candidates: &[EmbeddingVector]) -> f64 {
    candidates
        .iter()
        .map(|c| clamp01(v.cosine_similarity(c)))
        .fold(0.0, f64::max)
}

/// How far recent activity has wandered from the goals.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalDrift;

impl VectorMetric for GoalDrift {
    fn name(&self) -> &str {
        GOAL_DRIFT
    }

    fn compute(&self, input: &MetricInput) -> f64 {
        if input.goals.is_empty() || input.context.is_empty() {
            return 0.0;
        }
        let alignment: Vec<f64> = input
            .context
            .iter()
            .map(|c| best_match(c, &input.goals))
            .collect();
        clamp01(1.0 - mean(&alignment))
    }
}

/// How well each goal is backed by a goal-relevant memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryRetention;

impl VectorMetric for MemoryRetention {
    fn name(&self) -> &str {
        MEMORY_RETENTION
    }

    fn compute(&self, input: &MetricInput) -> f64 {
        if input.goals.is_empty() || input.goal_memories.is_empty() {
            return 0.0;
        }
        let coverage: Vec<f64> = input
            .goals
            .iter()
            .map(|g| best_match(g, &input.goal_memories))
            .collect();
        clamp01(mean(&coverage))
    }
}

/// How strongly recent activity opposes what the agent remembers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContradictionPressure;

impl VectorMetric for ContradictionPressure {
    fn name(&self) -> &str {
        CONTRADICTION_PRESSURE
    }

    fn compute(&self, input: &MetricInput) -> f64 {
        if input.context.is_empty() || input.memories.is_empty() {
            return 0.0;
        }
        let opposition: Vec<f64> = input
            .context
            .iter()
            .map(|c| {
                input
                    .memories
                    .iter()
                    .map(|m| clamp01(-c.cosine_similarity(m)))
                    .fold(0.0, f64::max)
            })
            .collect();
        clamp01(mean(&opposition))
    }
}

/// How scattered recent activity is around its own centre.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticDiffusion;

impl VectorMetric for SemanticDiffusion {
    fn name(&self) -> &str {
        SEMANTIC_DIFFUSION
    }

    fn compute(&self, input: &MetricInput) -> f64 {
        if input.context.len() < 2 {
            return 0.0;
        }
        let center = centroid(input.context.iter().map(|c| c.as_slice()));
        let spread: Vec<f64> = input
            .context
            .iter()
            .map(|c| 1.0 - clamp01(cosine_similarity(c.as_slice(), &center)))
            .collect();
        clamp01(mean(&spread))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn v(data: &[f32]) -> EmbeddingVector {
        EmbeddingVector::new(data.to_vec(), "test")
    }

    fn input(
        goals: Vec<EmbeddingVector>,
        context: Vec<EmbeddingVector>,
        memories: Vec<EmbeddingVector>,
        goal_memories: Vec<EmbeddingVector>,
    ) -> MetricInput {
        MetricInput::new(goals, context, memories, goal_memories)
    }

    #[test]
    fn test_all_builtins_zero_on_empty_input() {
        let empty = MetricInput::default();
        for metric in builtin_vector_metrics() {
            assert_eq!(metric.compute(&empty), 0.0, "{}", metric.name());
        }
    }

    #[test]
    fn test_goal_drift_aligned_context_is_zero() {
        let i = input(vec![v(&[1.0, 0.0])], vec![v(&[2.0, 0.0])], vec![], vec![]);
        assert!(GoalDrift.compute(&i).abs() < 1e-9);
    }

    #[test]
    fn test_goal_drift_orthogonal_context_is_one() {
        let i = input(vec![v(&[1.0, 0.0])], vec![v(&[0.0, 1.0])], vec![], vec![]);
        assert!((GoalDrift.compute(&i) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_goal_drift_uses_best_goal() {
        let i = input(
            vec![v(&[1.0, 0.0]), v(&[0.0, 1.0])],
            vec![v(&[0.0, 1.0])],
            vec![],
            vec![],
        );
        assert!(GoalDrift.compute(&i).abs() < 1e-9);
    }

    #[test]
    fn test_memory_retention_partial_coverage() {
        let i = input(
            vec![v(&[1.0, 0.0]), v(&[0.0, 1.0])],
            vec![],
            vec![],
            vec![v(&[1.0, 0.0])],
        );
        assert!((MemoryRetention.compute(&i) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_contradiction_pressure_opposed_memory() {
        let i = input(vec![], vec![v(&[1.0, 0.0])], vec![v(&[-1.0, 0.0])], vec![]);
        assert!((ContradictionPressure.compute(&i) - 1.0).abs() < 1e-9);

        let agreeing = input(vec![], vec![v(&[1.0, 0.0])], vec![v(&[1.0, 0.0])], vec![]);
        assert_eq!(ContradictionPressure.compute(&agreeing), 0.0);
    }

    #[test]
    fn test_semantic_diffusion_single_context_is_zero() {
        let i = input(vec![], vec![v(&[1.0, 0.0])], vec![], vec![]);
        assert_eq!(SemanticDiffusion.compute(&i), 0.0);
    }

    #[test]
    fn test_semantic_diffusion_identical_context_is_zero() {
        let i = input(vec![], vec![v(&[1.0, 1.0]), v(&[1.0, 1.0])], vec![], vec![]);
        assert!(SemanticDiffusion.compute(&i).abs() < 1e-6);
    }

    #[test]
    fn test_semantic_diffusion_spread_context_is_positive() {
        let i = input(vec![], vec![v(&[1.0, 0.0]), v(&[0.0, 1.0])], vec![], vec![]);
        let value = SemanticDiffusion.compute(&i);
        assert!(value > 0.2 && value < 0.4, "got {}", value);
    }

    #[test]
    fn test_empty_vectors_do_not_panic() {
        let i = input(
            vec![EmbeddingVector::empty()],
            vec![EmbeddingVector::empty(), v(&[1.0])],
            vec![EmbeddingVector::empty()],
            vec![EmbeddingVector::empty()],
        );
        for metric in builtin_vector_metrics() {
            let value = metric.compute(&i);
            assert!((0.0..=1.0).contains(&value), "{} = {}", metric.name(), value);
        }
    }
}
