//! Metric aggregation
//!
//! Collects data points for one metric identity and sends them to the
//! backend on a fixed interval.
//!
//! The buffer is the only shared mutable state. Its lock is held to append a
//! point and to swap the buffer for an empty one, never across a send, so a
//! slow backend does not stall ingestion. Batches are disjoint: a point lands
//! in exactly one flush.

mod tasks;

use async_trait::async_trait;
use metricflush_common::{
    CreateTimeSeriesRequest, DataPoint, MetricFlushError, MetricIdentity, TimeSeries,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::client::MetricWriter;
use crate::config::AggregationConfig;
use crate::ingest::{ingest_channel, IngestSender};
use crate::transport::TimeSeriesTransport;

/// State shared between the aggregation handle and its tasks
pub(crate) struct AggregationCore {
    project_id: String,
    identity: MetricIdentity,
    debug: bool,
    buffer: Mutex<Vec<DataPoint>>,
    transport: Arc<dyn TimeSeriesTransport>,
}

impl AggregationCore {
    pub(crate) fn new(
        project_id: String,
        identity: MetricIdentity,
        debug: bool,
        transport: Arc<dyn TimeSeriesTransport>,
    ) -> Self {
        Self {
            project_id,
            identity,
            debug,
            buffer: Mutex::new(Vec::new()),
            transport,
        }
    }

    fn append(&self, point: DataPoint) {
        self.buffer.lock().push(point);
    }

    /// Swap the buffer for an empty one; `None` when there is nothing to send
    fn take_batch(&self) -> Option<Vec<DataPoint>> {
        let mut buffer = self.buffer.lock();
        if buffer.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut *buffer))
    }

    /// One flush tick. Returns the number of points handed to `send`.
    async fn flush(&self) -> usize {
        match self.take_batch() {
            Some(batch) => {
                let count = batch.len();
                self.send(batch).await;
                count
            }
            None => 0,
        }
    }

    fn project_resource(&self) -> String {
        format!("projects/{}", self.project_id)
    }

    /// Send one batch as a single time series.
    ///
    /// Debug mode logs the request instead. A failed transmission is logged
    /// and the batch dropped.
    pub(crate) async fn send(&self, points: Vec<DataPoint>) {
        let request = CreateTimeSeriesRequest::single(TimeSeries::new(&self.identity, points));

        if self.debug {
            info!(time_series_request = ?request, "Metric not sent in debug mode");
            return;
        }

        let project_resource = self.project_resource();
        match self
            .transport
            .create_time_series(&project_resource, &request)
            .await
        {
            Ok(()) => debug!(
                transport = self.transport.name(),
                metric_type = %self.identity.metric_type,
                points = request.point_count(),
                "Flushed time series"
            ),
            Err(e) => error!(
                error = %e,
                transport = self.transport.name(),
                project = %project_resource,
                metric_type = %self.identity.metric_type,
                points = request.point_count(),
                "Failed to write time series data"
            ),
        }
    }

    #[cfg(test)]
    fn buffered(&self) -> Vec<DataPoint> {
        self.buffer.lock().clone()
    }
}

/// Aggregates points for one metric identity
///
/// Created through [`MonitoringClient`](crate::MonitoringClient). Share it
/// between producers behind an `Arc`.
///
/// Dropping the handle without [`shutdown`](Self::shutdown) still sends the
/// points buffered so far, from the drain task, and logs a warning.
pub struct MetricAggregation {
    core: Arc<AggregationCore>,
    ingest: IngestSender,
    flush_interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    tasks: Mutex<Option<(JoinHandle<()>, JoinHandle<()>)>>,
}

impl MetricAggregation {
    /// Start the drain and flush tasks for `core`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, or with a config that does
    /// not pass [`AggregationConfig::validate`].
    pub(crate) fn start(core: AggregationCore, config: &AggregationConfig) -> Self {
        let core = Arc::new(core);
        let (ingest, receiver) = ingest_channel(config.channel_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let drain = tokio::spawn(tasks::drain(core.clone(), receiver, shutdown_rx.clone()));
        let flush = tokio::spawn(tasks::flush_on_interval(
            core.clone(),
            config.flush_interval,
            shutdown_rx,
        ));

        info!(
            metric_type = %core.identity.metric_type,
            resource_type = %core.identity.resource_type,
            flush_interval_ms = config.flush_interval.as_millis() as u64,
            debug = core.debug,
            "Started metric aggregation"
        );

        Self {
            core,
            ingest,
            flush_interval: config.flush_interval,
            shutdown_tx,
            tasks: Mutex::new(Some((drain, flush))),
        }
    }

    /// Queue a point for the next flush.
    ///
    /// Waits while the ingest channel is full. Points written after
    /// [`shutdown`](Self::shutdown) are dropped with a warning.
    pub async fn write(&self, point: DataPoint) {
        if let Err(MetricFlushError::Closed) = self.ingest.write(point).await {
            warn!(metric_type = %self.core.identity.metric_type, "Aggregation shut down, dropping point");
        }
    }

    /// [`write`](Self::write) for synchronous callers.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub fn blocking_write(&self, point: DataPoint) {
        if let Err(MetricFlushError::Closed) = self.ingest.blocking_write(point) {
            warn!(metric_type = %self.core.identity.metric_type, "Aggregation shut down, dropping point");
        }
    }

    /// Run one flush tick now. Returns the number of points sent.
    pub async fn flush(&self) -> usize {
        self.core.flush().await
    }

    /// Stop both tasks and flush what is left.
    ///
    /// Points already queued in the ingest channel are drained into the
    /// buffer first. Later calls return without doing anything.
    pub async fn shutdown(&self) {
        let Some((drain, flush)) = self.tasks.lock().take() else {
            return;
        };

        let _ = self.shutdown_tx.send(true);
        if let Err(e) = drain.await {
            error!(error = %e, "Drain task failed");
        }
        if let Err(e) = flush.await {
            error!(error = %e, "Flush task failed");
        }

        let flushed = self.core.flush().await;
        info!(
            metric_type = %self.core.identity.metric_type,
            flushed,
            "Metric aggregation shut down"
        );
    }

    pub fn identity(&self) -> &MetricIdentity {
        &self.core.identity
    }

    pub fn project_id(&self) -> &str {
        &self.core.project_id
    }

    /// `projects/<project_id>`
    pub fn project_resource(&self) -> String {
        self.core.project_resource()
    }

    pub fn is_debug(&self) -> bool {
        self.core.debug
    }

    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    #[cfg(test)]
    fn buffered(&self) -> Vec<DataPoint> {
        self.core.buffered()
    }
}

#[async_trait]
impl MetricWriter for MetricAggregation {
    async fn write(&self, point: DataPoint) {
        MetricAggregation::write(self, point).await
    }
}
