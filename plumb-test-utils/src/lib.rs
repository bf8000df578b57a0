//! PLUMB Test Utilities
//!
//! Centralized test infrastructure for the PLUMB workspace:
//! - Mock collaborators (embedding provider, state provider, metrics)
//! - Proptest generators for snapshots, weights and thresholds
//! - Test fixtures for common scenarios
//! - Custom assertions

pub use plumb_core::{
    AgentState, Band, BandThresholds, CoherenceReading, EmbeddingProvider, EmbeddingVector,
    LlmError, MetricError, MetricSnapshot, MetricWeights, PlumbError, PlumbResult,
    StateCategory, StateError, StateProvider, Tick, TickReason,
};
pub use plumb_metrics::{MetricInput, Polarity, ScalarMetric, VectorMetric};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// MOCK EMBEDDING PROVIDERS
// ============================================================================

/// Deterministic embedding provider that records every batch it receives.
#[derive(Debug)]
pub struct CountingEmbeddingProvider {
    model_id: String,
    dimensions: i32,
    overrides: HashMap<String, Vec<f32>>,
    truncate_to: Option<usize>,
    batches: Mutex<Vec<Vec<String>>>,
}

impl CountingEmbeddingProvider {
    /// Provider producing `dimensions`-wide vectors; values below 1 are raised to 1.
    pub fn new(dimensions: i32) -> Self {
        Self {
            model_id: "mock-embedding".to_string(),
            dimensions: dimensions.max(1),
            overrides: HashMap::new(),
            truncate_to: None,
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Return `data` for `text` instead of the generated embedding.
    pub fn with_vector(mut self, text: impl Into<String>, data: Vec<f32>) -> Self {
        self.overrides.insert(text.into(), data);
        self
    }

    /// Return at most `len` vectors per batch.
    pub fn truncating_batches_to(mut self, len: usize) -> Self {
        self.truncate_to = Some(len);
        self
    }

    /// Number of `embed_batch` calls so far.
    pub fn batch_calls(&self) -> usize {
        self.batches.lock().map(|b| b.len()).unwrap_or(0)
    }

    /// Every batch received, in call order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().map(|b| b.clone()).unwrap_or_default()
    }

    fn generate_embedding(&self, text: &str) -> Vec<f32> {
        if let Some(data) = self.overrides.get(text) {
            return data.clone();
        }

        let mut data = vec![0.0f32; self.dimensions as usize];
        for (i, byte) in text.bytes().enumerate() {
            let idx = i % self.dimensions as usize;
            data[idx] += (byte as f32) / 255.0;
        }

        let norm: f32 = data.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut data {
                *x /= norm;
            }
        }
        data
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbeddingProvider {
    async fn embed(&self, text: &str) -> PlumbResult<EmbeddingVector> {
        Ok(EmbeddingVector::new(
            self.generate_embedding(text),
            self.model_id.clone(),
        ))
    }

    async fn embed_batch(&self, texts: &[&str]) -> PlumbResult<Vec<EmbeddingVector>> {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push(texts.iter().map(|t| t.to_string()).collect());
        }

        let take = self.truncate_to.unwrap_or(texts.len());
        let mut results = Vec::with_capacity(take.min(texts.len()));
        for text in texts.iter().take(take) {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    fn dimensions(&self) -> i32 {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Embedding provider whose every call fails.
#[derive(Debug, Clone)]
pub struct FailingEmbeddingProvider {
    reason: String,
}

impl FailingEmbeddingProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> PlumbError {
        PlumbError::Llm(LlmError::EmbeddingFailed {
            reason: self.reason.clone(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn embed(&self, _text: &str) -> PlumbResult<EmbeddingVector> {
        Err(self.error())
    }

    async fn embed_batch(&self, _texts: &[&str]) -> PlumbResult<Vec<EmbeddingVector>> {
        Err(self.error())
    }

    fn dimensions(&self) -> i32 {
        0
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}

// ============================================================================
// MOCK STATE PROVIDERS
// ============================================================================

/// State provider serving a fixed snapshot.
#[derive(Debug, Default)]
pub struct StaticStateProvider {
    state: Mutex<AgentState>,
    calls: AtomicUsize,
}

impl StaticStateProvider {
    pub fn new(state: AgentState) -> Self {
        Self {
            state: Mutex::new(state),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(AgentState::default())
    }

    /// Replace the served snapshot.
    pub fn set_state(&self, state: AgentState) {
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
    }

    /// Total accessor calls so far (four per measurement).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn category(&self, category: StateCategory) -> PlumbResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .state
            .lock()
            .map(|s| s.category(category).to_vec())
            .unwrap_or_default())
    }
}

#[async_trait]
impl StateProvider for StaticStateProvider {
    async fn goals(&self) -> PlumbResult<Vec<String>> {
        self.category(StateCategory::Goals)
    }

    async fn recent_context(&self) -> PlumbResult<Vec<String>> {
        self.category(StateCategory::RecentContext)
    }

    async fn goal_memories(&self) -> PlumbResult<Vec<String>> {
        self.category(StateCategory::GoalMemories)
    }

    async fn all_memories(&self) -> PlumbResult<Vec<String>> {
        self.category(StateCategory::AllMemories)
    }
}

/// State provider failing for one category and empty for the others.
#[derive(Debug, Clone)]
pub struct FailingStateProvider {
    failing: StateCategory,
    reason: String,
}

impl FailingStateProvider {
    pub fn new(failing: StateCategory, reason: impl Into<String>) -> Self {
        Self {
            failing,
            reason: reason.into(),
        }
    }

    fn category(&self, category: StateCategory) -> PlumbResult<Vec<String>> {
        if category == self.failing {
            return Err(StateError::Unavailable {
                category,
                reason: self.reason.clone(),
            }
            .into());
        }
        Ok(Vec::new())
    }
}

#[async_trait]
impl StateProvider for FailingStateProvider {
    async fn goals(&self) -> PlumbResult<Vec<String>> {
        self.category(StateCategory::Goals)
    }

    async fn recent_context(&self) -> PlumbResult<Vec<String>> {
        self.category(StateCategory::RecentContext)
    }

    async fn goal_memories(&self) -> PlumbResult<Vec<String>> {
        self.category(StateCategory::GoalMemories)
    }

    async fn all_memories(&self) -> PlumbResult<Vec<String>> {
        self.category(StateCategory::AllMemories)
    }
}

// ============================================================================
// MOCK METRICS
// ============================================================================

/// Vector metric returning a constant.
#[derive(Debug, Clone)]
pub struct FixedVectorMetric {
    name: String,
    value: f64,
    polarity: Polarity,
}

impl FixedVectorMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            polarity: Polarity::Undeclared,
        }
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }
}

impl VectorMetric for FixedVectorMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn compute(&self, _input: &MetricInput) -> f64 {
        self.value
    }
}

/// Scalar metric that suspends once, then returns a constant.
#[derive(Debug)]
pub struct FixedScalarMetric {
    name: String,
    value: f64,
    polarity: Polarity,
    calls: AtomicUsize,
}

impl FixedScalarMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            polarity: Polarity::Undeclared,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScalarMetric for FixedScalarMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn polarity(&self) -> Polarity {
        self.polarity
    }

    async fn compute(&self) -> PlumbResult<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self.value)
    }
}

/// Scalar metric whose computation always fails.
#[derive(Debug, Clone)]
pub struct FailingScalarMetric {
    name: String,
    reason: String,
}

impl FailingScalarMetric {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ScalarMetric for FailingScalarMetric {
    fn name(&self) -> &str {
        &self.name
    }

    async fn compute(&self) -> PlumbResult<f64> {
        Err(MetricError::ComputeFailed {
            metric: self.name.clone(),
            reason: self.reason.clone(),
        }
        .into())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Ready-made values for common test scenarios.

    use super::*;
    use chrono::{TimeZone, Utc};

    /// Owned strings from string literals.
    pub fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Tick with a fixed timestamp derived from `sequence`.
    pub fn tick(sequence: u64) -> Tick {
        let timestamp = Utc
            .timestamp_opt(1_700_000_000 + sequence as i64, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Tick::new(timestamp, sequence, TickReason::Scheduled)
    }

    /// Minimal reading carrying `sequence`.
    pub fn reading_with_sequence(sequence: u64) -> CoherenceReading {
        CoherenceReading::new(&tick(sequence), MetricSnapshot::seeded(), 0.75, Band::Yellow)
    }

    /// State with the same text in every category.
    pub fn uniform_state(text: &str) -> AgentState {
        AgentState {
            goals: strings(&[text]),
            recent_context: strings(&[text]),
            all_memories: strings(&[text]),
            goal_memories: strings(&[text]),
        }
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for PLUMB value types.

    use super::*;
    use proptest::prelude::*;

    /// A value in [0, 1].
    pub fn arb_unit_value() -> impl Strategy<Value = f64> {
        0.0f64..=1.0
    }

    /// Short metric names.
    pub fn arb_metric_name() -> impl Strategy<Value = String> {
        "[a-z]{1,8}(-[a-z]{1,8})?"
    }

    /// Snapshot of up to eight metrics with values in [0, 1].
    pub fn arb_snapshot() -> impl Strategy<Value = MetricSnapshot> {
        prop::collection::vec((arb_metric_name(), arb_unit_value()), 0..8)
            .prop_map(|entries| entries.into_iter().collect())
    }

    /// Non-negative weights for up to eight metrics.
    pub fn arb_weights() -> impl Strategy<Value = MetricWeights> {
        prop::collection::vec((arb_metric_name(), 0.0f64..10.0), 0..8)
            .prop_map(|entries| entries.into_iter().collect())
    }

    /// Strictly descending thresholds inside [0, 1].
    pub fn arb_thresholds() -> impl Strategy<Value = BandThresholds> {
        (0.0f64..0.3, 0.01f64..0.3, 0.01f64..0.3).prop_map(|(orange, gap1, gap2)| {
            let yellow = orange + gap1;
            let green = yellow + gap2;
            BandThresholds::new(green, yellow, orange)
        })
    }

    /// Agent state drawn from a small vocabulary so texts repeat.
    pub fn arb_agent_state() -> impl Strategy<Value = AgentState> {
        let text = prop::sample::select(vec![
            "ship the release",
            "fix the flaky test",
            "review the design",
            "answer support tickets",
            "refactor the parser",
        ])
        .prop_map(str::to_string);
        let list = prop::collection::vec(text, 0..5);
        (list.clone(), list.clone(), list.clone(), list).prop_map(
            |(goals, recent_context, all_memories, goal_memories)| AgentState {
                goals,
                recent_context,
                all_memories,
                goal_memories,
            },
        )
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// Assert that `value` lies in [0, 1] and is not NaN.
pub fn assert_unit_interval(value: f64) {
    assert!(
        !value.is_nan() && (0.0..=1.0).contains(&value),
        "expected value in [0, 1], got {}",
        value
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counting_provider_records_batches() {
        let provider = CountingEmbeddingProvider::new(16);
        let vectors = provider.embed_batch(&["a", "b"]).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].dimensions, 16);
        assert_eq!(provider.batch_calls(), 1);
        assert_eq!(provider.batches(), vec![fixtures::strings(&["a", "b"])]);
    }

    #[tokio::test]
    async fn test_counting_provider_raises_non_positive_dimensions() {
        for dimensions in [0, -3] {
            let provider = CountingEmbeddingProvider::new(dimensions);
            assert_eq!(provider.dimensions(), 1);
            let vector = provider.embed("hello").await.unwrap();
            assert_eq!(vector.data.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_failing_state_provider_only_fails_its_category() {
        let provider = FailingStateProvider::new(StateCategory::AllMemories, "offline");
        assert!(provider.goals().await.unwrap().is_empty());
        assert!(provider.all_memories().await.is_err());
    }

    #[test]
    fn test_fixture_tick_is_deterministic() {
        assert_eq!(fixtures::tick(3), fixtures::tick(3));
        assert_eq!(fixtures::reading_with_sequence(9).tick_sequence, 9);
    }
}
