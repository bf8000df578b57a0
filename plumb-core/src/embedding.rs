//! Embedding vector type

use crate::vector;
use serde::{Deserialize, Serialize};

/// Embedding vector with dynamic dimensions.
/// Supports any embedding model dimension (e.g., 384, 768, 1536, 3072).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    /// The embedding data as a vector of f32 values.
    pub data: Vec<f32>,
    /// Identifier of the model that produced this embedding.
    pub model_id: String,
    /// Number of dimensions (must match data.len()).
    pub dimensions: i32,
}

impl EmbeddingVector {
    /// Create a new embedding vector.
    pub fn new(data: Vec<f32>, model_id: impl Into<String>) -> Self {
        let dimensions = data.len() as i32;
        Self {
            data,
            model_id: model_id.into(),
            dimensions,
        }
    }

    /// The zero-length vector used for text that could not be resolved.
    pub fn empty() -> Self {
        Self::new(Vec::new(), String::new())
    }

    /// Cosine similarity with another embedding; 0 when dimensions differ.
    pub fn cosine_similarity(&self, other: &EmbeddingVector) -> f64 {
        vector::cosine_similarity(&self.data, &other.data)
    }

    /// Borrow the raw components.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Check if this vector has valid dimensions.
    pub fn is_valid(&self) -> bool {
        self.dimensions > 0 && self.data.len() == self.dimensions as usize
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
