//! PLUMB Core - Shared Types
//!
//! Data types, errors, vector math and collaborator traits used by every
//! other PLUMB crate. No measurement logic lives here.

use chrono::{DateTime, Utc};
use uuid::Uuid;

mod band;
mod config;
mod embedding;
mod error;
mod llm;
mod reading;
mod state;
mod tick;
pub mod vector;

pub use band::{
    classify_band, Band, BandParseError, BandThresholds, DEFAULT_GREEN_THRESHOLD,
    DEFAULT_ORANGE_THRESHOLD, DEFAULT_YELLOW_THRESHOLD,
};
pub use config::{validate_history_size, SensorSettings, DEFAULT_HISTORY_SIZE};
pub use embedding::EmbeddingVector;
pub use error::{
    ConfigError, LlmError, MeasureError, MetricError, PlumbError, PlumbResult, StateError,
};
pub use llm::EmbeddingProvider;
pub use reading::{
    CoherenceReading, MetricSnapshot, MetricWeights, BUILTIN_METRIC_NAMES,
    CONTRADICTION_PRESSURE, GOAL_DRIFT, MEMORY_RETENTION, SEMANTIC_DIFFUSION,
};
pub use state::{AgentState, StateCategory, StateProvider};
pub use tick::{Tick, TickReason};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Sensor identifier using UUIDv7 for timestamp-sortable IDs.
pub type SensorId = Uuid;

/// Generate a new UUIDv7 SensorId.
pub fn new_sensor_id() -> SensorId {
    Uuid::now_v7()
}
