//! Error types for metricflush
//!
//! Only construction and transmission can fail. Transmission errors never
//! reach producers; the aggregator logs them and drops the batch.

use thiserror::Error;

/// Result type alias using MetricFlushError
pub type Result<T> = std::result::Result<T, MetricFlushError>;

/// Unified error type for metricflush operations
#[derive(Debug, Error)]
pub enum MetricFlushError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Credential errors
    #[error("Credentials unavailable: {0}")]
    Credentials(String),

    // Network errors
    #[error("Transport error: {0}")]
    Transport(String),

    // Backend rejected the request
    #[error("Backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Aggregation is shut down")]
    Closed,

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for MetricFlushError {
    fn from(err: serde_json::Error) -> Self {
        MetricFlushError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for MetricFlushError {
    fn from(err: anyhow::Error) -> Self {
        MetricFlushError::Internal(err.to_string())
    }
}
