//! Embedding provider trait.
//!
//! PLUMB does not implement any embedding model. Callers supply a provider
//! that turns text into vectors; the sensor only ever calls `embed_batch`.

use crate::{EmbeddingVector, PlumbResult};
use async_trait::async_trait;

/// Trait for embedding providers.
/// Implementations must be thread-safe (Send + Sync).
///
/// # Example
/// ```ignore
/// struct OpenAIEmbedding { /* ... */ }
///
/// #[async_trait]
/// impl EmbeddingProvider for OpenAIEmbedding {
///     async fn embed(&self, text: &str) -> PlumbResult<EmbeddingVector> {
///         // Call OpenAI API
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    ///
    /// # Returns
    /// * `Ok(EmbeddingVector)` - The embedding vector
    /// * `Err(PlumbError::Llm)` - If embedding fails
    async fn embed(&self, text: &str) -> PlumbResult<EmbeddingVector>;

    /// Generate embeddings for multiple texts in a batch.
    ///
    /// # Returns
    /// * `Ok(Vec<EmbeddingVector>)` - One vector per input, in input order
    /// * `Err(PlumbError::Llm)` - If embedding fails
    async fn embed_batch(&self, texts: &[&str]) -> PlumbResult<Vec<EmbeddingVector>>;

    /// Get the number of dimensions this provider produces.
    fn dimensions(&self) -> i32;

    /// Get the model identifier for this provider.
    fn model_id(&self) -> &str;
}
