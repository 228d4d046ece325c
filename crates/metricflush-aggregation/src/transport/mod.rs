//! Time series transport
//!
//! The single injection point for transmission. The aggregation hands every
//! non-empty batch to a [`TimeSeriesTransport`]; swapping the implementation
//! changes where batches go without touching the aggregation logic.

pub mod http;

use async_trait::async_trait;
use metricflush_common::{CreateTimeSeriesRequest, Result};

/// Transmits time series to a backend
#[async_trait]
pub trait TimeSeriesTransport: Send + Sync {
    /// Write `request` under `project_resource` (`projects/<id>`).
    ///
    /// Called at most once per flushed batch; callers do not retry.
    async fn create_time_series(
        &self,
        project_resource: &str,
        request: &CreateTimeSeriesRequest,
    ) -> Result<()>;

    /// Name of this transport for logging
    fn name(&self) -> &str {
        "transport"
    }
}
