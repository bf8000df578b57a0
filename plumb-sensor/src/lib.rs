//! PLUMB Sensor - Coherence Measurement
//!
//! Composes state fetching, deduplicated embedding, metric evaluation,
//! polarity resolution, aggregation and band classification into a single
//! per-tick measurement, and keeps a bounded history of the readings.
//!
//! # Example
//! ```ignore
//! let sensor = CoherenceSensor::builder(embedder, state)
//!     .history_size(50)
//!     .notify_with(|reading| {
//!         println!("{} {}", reading.coherence_index, reading.band);
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let reading = sensor.measure(&Tick::now(1, TickReason::Scheduled)).await?;
//! ```

pub mod history;
mod notify;
pub mod resolver;
mod sensor;

pub use history::HistoryBuffer;
pub use notify::{FnNotifier, ReadingNotifier};
pub use resolver::{resolve_embeddings, unique_texts, ResolvedEmbeddings};
pub use sensor::{CoherenceSensor, SensorBuilder};

// Re-export the types needed to configure and read a sensor.
pub use plumb_core::{
    Band, BandThresholds, CoherenceReading, EmbeddingProvider, MetricSnapshot, MetricWeights,
    PlumbError, PlumbResult, SensorSettings, StateProvider, Tick, TickReason,
};
pub use plumb_metrics::{MetricSet, Polarity, ScalarMetric, VectorMetric};
