//! The coherence sensor: one measurement per tick.

use crate::history::HistoryBuffer;
use crate::notify::{FnNotifier, ReadingNotifier};
use crate::resolver::resolve_embeddings;
use futures_util::future::try_join4;
use plumb_core::{
    new_sensor_id, AgentState, BandThresholds, CoherenceReading, EmbeddingProvider,
    MeasureError, MetricSnapshot, MetricWeights, PlumbError, PlumbResult, SensorId,
    SensorSettings, StateCategory, StateProvider, Tick,
};
use plumb_metrics::{aggregate, evaluate, resolve_inverted, MetricSet, ScalarMetric, VectorMetric};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::Instrument;

/// Measures agent coherence and keeps a bounded history of readings.
///
/// Overlapping `measure` calls on one sensor are allowed, but their readings
/// enter the history in completion order, not call order.
pub struct CoherenceSensor {
    id: SensorId,
    embedder: Arc<dyn EmbeddingProvider>,
    state: Arc<dyn StateProvider>,
    metrics: MetricSet,
    weights: MetricWeights,
    thresholds: BandThresholds,
    notifier: Option<Arc<dyn ReadingNotifier>>,
    history: RwLock<HistoryBuffer>,
}

impl CoherenceSensor {
    /// Start configuring a sensor. Everything but the two providers has a default.
    pub fn builder(
        embedder: Arc<dyn EmbeddingProvider>,
        state: Arc<dyn StateProvider>,
    ) -> SensorBuilder {
        SensorBuilder::new(embedder, state)
    }

    /// Take one measurement.
    ///
    /// Failures before the reading is assembled leave the history untouched
    /// and skip the notifier. A notifier failure is reported after the
    /// reading has already been recorded.
    pub async fn measure(&self, tick: &Tick) -> PlumbResult<CoherenceReading> {
        let span = tracing::info_span!(
            "coherence_measure",
            sensor_id = %self.id,
            sequence = tick.sequence,
        );
        self.run(tick).instrument(span).await
    }

    async fn run(&self, tick: &Tick) -> PlumbResult<CoherenceReading> {
        let state = self
            .fetch_state()
            .await
            .inspect_err(|e| tracing::warn!(stage = "state", error = %e, "Measurement failed"))?;
        tracing::debug!(texts = state.text_count(), "Fetched agent state");

        let resolved = resolve_embeddings(self.embedder.as_ref(), &state)
            .await
            .inspect_err(|e| tracing::warn!(stage = "embedding", error = %e, "Measurement failed"))?;
        tracing::debug!(unique_texts = resolved.unique_texts, "Resolved embeddings");

        let mut snapshot = MetricSnapshot::seeded();
        evaluate(&self.metrics, &resolved.input, &mut snapshot)
            .await
            .inspect_err(|e| tracing::warn!(stage = "metrics", error = %e, "Measurement failed"))?;

        let inverted = resolve_inverted(&self.metrics.descriptors());
        tracing::debug!(
            metrics = snapshot.len(),
            mode = ?inverted.mode(),
            inverted = ?inverted.iter().collect::<Vec<_>>(),
            "Resolved metric polarity"
        );

        let index = aggregate(&snapshot, &self.weights, &inverted);
        let band = self.thresholds.classify(index);
        let reading = CoherenceReading::new(tick, snapshot, index, band);

        self.history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .record(reading.clone());
        tracing::info!(coherence_index = index, band = %band, "Recorded coherence reading");

        if let Some(notifier) = &self.notifier {
            notifier.notify(&reading).await.map_err(|e| {
                tracing::warn!(error = %e, "Reading notifier failed");
                PlumbError::Measure(MeasureError::Notification {
                    reason: e.to_string(),
                })
            })?;
        }

        Ok(reading)
    }

    async fn fetch_state(&self) -> PlumbResult<AgentState> {
        let (goals, recent_context, goal_memories, all_memories) = try_join4(
            fetch(StateCategory::Goals, self.state.goals()),
            fetch(StateCategory::RecentContext, self.state.recent_context()),
            fetch(StateCategory::GoalMemories, self.state.goal_memories()),
            fetch(StateCategory::AllMemories, self.state.all_memories()),
        )
        .await?;

        Ok(AgentState {
            goals,
            recent_context,
            all_memories,
            goal_memories,
        })
    }

    /// Past readings, newest first. `None` returns the whole history.
    pub fn history(&self, count: Option<usize>) -> Vec<CoherenceReading> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .retrieve(count)
    }

    /// Most recent reading, if any.
    pub fn latest(&self) -> Option<CoherenceReading> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latest()
            .cloned()
    }

    pub fn history_len(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    pub fn metrics(&self) -> &MetricSet {
        &self.metrics
    }

    pub fn weights(&self) -> &MetricWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &BandThresholds {
        &self.thresholds
    }
}

impl fmt::Debug for CoherenceSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoherenceSensor")
            .field("id", &self.id)
            .field("model_id", &self.embedder.model_id())
            .field("metrics", &self.metrics)
            .field("weights", &self.weights)
            .field("thresholds", &self.thresholds)
            .field("notifier", &self.notifier.is_some())
            .field("history_len", &self.history_len())
            .finish()
    }
}

async fn fetch<F>(category: StateCategory, accessor: F) -> PlumbResult<Vec<String>>
where
    F: Future<Output = PlumbResult<Vec<String>>>,
{
    accessor.await.map_err(|e| {
        PlumbError::Measure(MeasureError::StateFetch {
            category,
            reason: e.to_string(),
        })
    })
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`CoherenceSensor`].
///
/// Defaults: the four built-in vector metrics, no scalar metrics, equal
/// 0.25 weights, thresholds 0.8/0.6/0.4, history of 100, no notifier.
pub struct SensorBuilder {
    embedder: Arc<dyn EmbeddingProvider>,
    state: Arc<dyn StateProvider>,
    metrics: MetricSet,
    settings: SensorSettings,
    notifier: Option<Arc<dyn ReadingNotifier>>,
}

impl SensorBuilder {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, state: Arc<dyn StateProvider>) -> Self {
        Self {
            embedder,
            state,
            metrics: MetricSet::builtin(),
            settings: SensorSettings::default(),
            notifier: None,
        }
    }

    /// Replace the active vector metrics.
    pub fn vector_metrics(mut self, metrics: Vec<Arc<dyn VectorMetric>>) -> Self {
        self.metrics.vector = metrics;
        self
    }

    /// Replace the active scalar metrics.
    pub fn scalar_metrics(mut self, metrics: Vec<Arc<dyn ScalarMetric>>) -> Self {
        self.metrics.scalar = metrics;
        self
    }

    pub fn add_vector_metric(mut self, metric: Arc<dyn VectorMetric>) -> Self {
        self.metrics.vector.push(metric);
        self
    }

    pub fn add_scalar_metric(mut self, metric: Arc<dyn ScalarMetric>) -> Self {
        self.metrics.scalar.push(metric);
        self
    }

    pub fn weights(mut self, weights: MetricWeights) -> Self {
        self.settings.weights = weights;
        self
    }

    pub fn thresholds(mut self, thresholds: BandThresholds) -> Self {
        self.settings.thresholds = thresholds;
        self
    }

    pub fn history_size(mut self, history_size: usize) -> Self {
        self.settings.history_size = history_size;
        self
    }

    /// Replace weights, thresholds and history size at once.
    pub fn settings(mut self, settings: SensorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn ReadingNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Use a synchronous closure as the notifier.
    pub fn notify_with<F>(self, callback: F) -> Self
    where
        F: Fn(&CoherenceReading) -> PlumbResult<()> + Send + Sync + 'static,
    {
        self.notifier(Arc::new(FnNotifier::new(callback)))
    }

    /// Validate the settings and build the sensor.
    pub fn build(self) -> PlumbResult<CoherenceSensor> {
        self.settings.validate()?;

        let sensor = CoherenceSensor {
            id: new_sensor_id(),
            embedder: self.embedder,
            state: self.state,
            metrics: self.metrics,
            weights: self.settings.weights,
            thresholds: self.settings.thresholds,
            notifier: self.notifier,
            history: RwLock::new(HistoryBuffer::new(self.settings.history_size)),
        };
        tracing::debug!(
            sensor_id = %sensor.id,
            vector_metrics = sensor.metrics.vector.len(),
            scalar_metrics = sensor.metrics.scalar.len(),
            history_size = self.settings.history_size,
            "Built coherence sensor"
        );
        Ok(sensor)
    }
}

impl fmt::Debug for SensorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorBuilder")
            .field("metrics", &self.metrics)
            .field("settings", &self.settings)
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}
