//! # metricflush Common
//!
//! Shared types and errors for the metricflush aggregation pipeline.
//!
//! ## Core Types
//!
//! - [`DataPoint`]: one immutable timestamped measurement
//! - [`MetricIdentity`]: metric/resource tuple describing what a batch measures
//! - [`TimeSeries`]/[`CreateTimeSeriesRequest`]: the record handed to a backend on flush
//!
//! ## Point Factory
//!
//! [`create_data_point`] stamps a value with the current UTC instant.

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{MetricFlushError, Result};
pub use types::{
    identity::{Labels, MetricIdentity},
    point::{create_data_point, DataPoint, TimeInterval, TypedValue},
    time_series::{CreateTimeSeriesRequest, Metric, MonitoredResource, TimeSeries},
};

/// metricflush version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
