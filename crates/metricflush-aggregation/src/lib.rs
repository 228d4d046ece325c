//! # metricflush Aggregation
//!
//! Buffers metric data points in memory and periodically flushes them to a
//! time series backend.
//!
//! ## Pipeline
//!
//! ```text
//! producer -> write(point) -> ingest channel -> drain task -> buffer
//!          -> interval tick -> buffer swap -> transport -> backend
//! ```
//!
//! - [`ingest`]: bounded channel, the only backpressure mechanism
//! - [`aggregation`]: [`MetricAggregation`] with its drain and flush tasks
//! - [`transport`]: the injectable [`TimeSeriesTransport`] and its HTTP implementation
//! - [`client`]: [`MonitoringClient`] factory and the writer/creator traits
//!
//! Transmission is best effort: a failed flush is logged and the batch is
//! dropped. Producers never observe backend failures.

pub mod aggregation;
pub mod client;
pub mod config;
pub mod ingest;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

use std::time::Duration;

pub use aggregation::MetricAggregation;
pub use client::{MetricCreator, MetricWriter, MonitoringClient};
pub use config::{AggregationConfig, MonitoringConfig};
pub use ingest::{ingest_channel, IngestReceiver, IngestSender};
pub use transport::{http::HttpTransport, TimeSeriesTransport};

pub use metricflush_common::{
    create_data_point, CreateTimeSeriesRequest, DataPoint, Labels, MetricFlushError,
    MetricIdentity, Result, TimeSeries,
};

/// Points the ingest channel holds before writers block
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Interval between flushes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(60);

/// Cloud Monitoring API root
pub const DEFAULT_ENDPOINT: &str = "https://monitoring.googleapis.com";

/// Per-request timeout of the HTTP transport
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
