//! Construction-time configuration
//!
//! Both the flush interval and the channel capacity are fixed for the
//! lifetime of an aggregation.

use metricflush_common::{MetricFlushError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Aggregation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Time between flush ticks
    pub flush_interval: Duration,
    /// Capacity of the ingest channel
    pub channel_capacity: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            flush_interval: crate::DEFAULT_FLUSH_INTERVAL,
            channel_capacity: crate::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.flush_interval.is_zero() {
            return Err(MetricFlushError::Config(
                "flush_interval must be greater than zero".into(),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(MetricFlushError::Config(
                "channel_capacity must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Monitoring client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Project the time series belong to
    pub project_id: String,
    /// Log flushes instead of transmitting them
    pub debug: bool,
    /// API root, without the `/v3` suffix
    pub endpoint: String,
    /// OAuth2 bearer token; required unless `debug` is set
    pub access_token: Option<String>,
    /// Timeout applied to each flush request
    pub request_timeout: Duration,
    /// Settings shared by every aggregation created by the client
    pub aggregation: AggregationConfig,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            debug: false,
            endpoint: crate::DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            request_timeout: crate::DEFAULT_REQUEST_TIMEOUT,
            aggregation: AggregationConfig::default(),
        }
    }
}

impl MonitoringConfig {
    /// Config for `project_id` with every other setting defaulted
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(MetricFlushError::Config("project_id is required".into()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(MetricFlushError::Config("endpoint is required".into()));
        }
        self.aggregation.validate()
    }
}
