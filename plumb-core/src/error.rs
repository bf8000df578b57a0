//! Error types for PLUMB operations

use crate::StateCategory;
use thiserror::Error;

/// Embedding provider errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("No embedding provider configured")]
    ProviderNotConfigured,

    #[error("Request to {provider} failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: i32,
        message: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Embedding failed: {reason}")]
    EmbeddingFailed { reason: String },
}

/// Agent state provider errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("State category {category} unavailable: {reason}")]
    Unavailable {
        category: StateCategory,
        reason: String,
    },
}

/// Errors raised by metric computations.
///
/// A metric whose data source is unavailable returns `Ok(0.0)` instead of an
/// error; any error fails the whole measurement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricError {
    #[error("Metric {metric} failed: {reason}")]
    ComputeFailed { metric: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },
}

/// Failures of a single coherence measurement.
///
/// Every variant is fatal to the enclosing measurement. Only `Notification`
/// can occur after the reading has been recorded in history.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MeasureError {
    #[error("Failed to fetch {category} from state provider: {reason}")]
    StateFetch {
        category: StateCategory,
        reason: String,
    },

    #[error("Embedding batch failed: {reason}")]
    Embedding { reason: String },

    #[error("Scalar metric {metric} failed: {reason}")]
    ScalarMetric { metric: String, reason: String },

    #[error("Reading notification failed: {reason}")]
    Notification { reason: String },
}

/// Master error type for all PLUMB errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlumbError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Measurement failed: {0}")]
    Measure(#[from] MeasureError),
}

/// Result type alias for PLUMB operations.
pub type PlumbResult<T> = Result<T, PlumbError>;

// =============================================================================
// TESTS
// =============================================================================
