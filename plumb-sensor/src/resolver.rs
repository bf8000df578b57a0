//! Deduplicated embedding resolution.
//!
//! Every distinct text across the four state categories is embedded once,
//! in a single batch call, and the vectors are fanned back out to lists
//! aligned with the original texts.

use plumb_core::{
    AgentState, EmbeddingProvider, EmbeddingVector, MeasureError, PlumbError, PlumbResult,
};
use plumb_metrics::MetricInput;
use std::collections::{HashMap, HashSet};

/// Embeddings for one measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEmbeddings {
    pub input: MetricInput,
    /// Number of distinct texts sent to the provider
    pub unique_texts: usize,
}

/// Distinct texts across all categories, in first-occurrence order.
pub fn unique_texts(state: &AgentState) -> Vec<&str> {
    let lists = [
        &state.goals,
        &state.recent_context,
        &state.all_memories,
        &state.goal_memories,
    ];

    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for text in lists.into_iter().flatten() {
        if seen.insert(text.as_str()) {
            unique.push(text.as_str());
        }
    }
    unique
}

/// Resolve every state text to an embedding.
///
/// The provider is not called at all when the state holds no text.
/// Texts the provider returned no vector for resolve to an empty vector.
pub async fn resolve_embeddings(
    provider: &dyn EmbeddingProvider,
    state: &AgentState,
) -> PlumbResult<ResolvedEmbeddings> {
    let unique = unique_texts(state);
    if unique.is_empty() {
        return Ok(ResolvedEmbeddings {
            input: MetricInput::default(),
            unique_texts: 0,
        });
    }

    let vectors = provider.embed_batch(&unique).await.map_err(|e| {
        PlumbError::Measure(MeasureError::Embedding {
            reason: e.to_string(),
        })
    })?;

    if vectors.len() != unique.len() {
        tracing::warn!(
            requested = unique.len(),
            returned = vectors.len(),
            model_id = provider.model_id(),
            "Embedding provider returned a batch of unexpected size"
        );
    }

    let lookup: HashMap<&str, EmbeddingVector> = unique.iter().copied().zip(vectors).collect();
    let resolve = |texts: &[String]| -> Vec<EmbeddingVector> {
        texts
            .iter()
            .map(|t| {
                lookup
                    .get(t.as_str())
                    .cloned()
                    .unwrap_or_else(EmbeddingVector::empty)
            })
            .collect()
    };

    Ok(ResolvedEmbeddings {
        input: MetricInput::new(
            resolve(&state.goals),
            resolve(&state.recent_context),
            resolve(&state.all_memories),
            resolve(&state.goal_memories),
        ),
        unique_texts: unique.len(),
    })
}

// =============================================================================
// TESTS
// =============================================================================
