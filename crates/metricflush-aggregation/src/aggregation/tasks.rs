//! Background tasks of an aggregation
//!
//! The drain task moves points from the ingest channel into the buffer. The
//! flush task swaps the buffer out on every tick and sends the batch. Both stop
//! when the shutdown signal changes or its sender is dropped.
//!
//! An explicit shutdown leaves the final flush to the handle. When the handle
//! is dropped instead, the drain task sends whatever is left before exiting.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::AggregationCore;
use crate::ingest::IngestReceiver;

/// Append every received point to the buffer.
///
/// On shutdown the channel is closed and the points still queued are drained
/// before the task exits. If the handle was dropped, the buffer is flushed too.
pub(super) async fn drain(
    core: Arc<AggregationCore>,
    mut ingest: IngestReceiver,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            point = ingest.recv() => match point {
                Some(point) => core.append(point),
                // Every sender is gone, so the handle was dropped
                None => break,
            },
            changed = shutdown.changed() => {
                ingest.close();
                let mut drained = 0usize;
                while let Some(point) = ingest.recv().await {
                    core.append(point);
                    drained += 1;
                }
                debug!(drained, metric_type = %core.identity.metric_type, "Ingest channel closed");
                if changed.is_ok() {
                    return;
                }
                break;
            }
        }
    }

    let flushed = core.flush().await;
    if flushed > 0 {
        warn!(
            flushed,
            metric_type = %core.identity.metric_type,
            "Aggregation dropped without shutdown, flushed remaining points"
        );
    }
}

/// Flush once per `period`; the first tick fires one full period after start.
pub(super) async fn flush_on_interval(
    core: Arc<AggregationCore>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                core.flush().await;
            }
            _ = shutdown.changed() => break,
        }
    }
    debug!(metric_type = %core.identity.metric_type, "Flush task stopped");
}
