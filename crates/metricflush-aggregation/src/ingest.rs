//! Bounded ingest channel
//!
//! Many producers, one reader. A full channel suspends writers until the
//! reader removes a point; it never drops points and never grows.

use metricflush_common::{DataPoint, MetricFlushError, Result};
use tokio::sync::mpsc;

/// Create an ingest channel holding at most `capacity` points.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn ingest_channel(capacity: usize) -> (IngestSender, IngestReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (IngestSender { tx }, IngestReceiver { rx })
}

/// Producer side of the ingest channel
#[derive(Debug, Clone)]
pub struct IngestSender {
    tx: mpsc::Sender<DataPoint>,
}

impl IngestSender {
    /// Enqueue a point, waiting while the channel is full.
    ///
    /// Fails only once the receiver has been closed.
    pub async fn write(&self, point: DataPoint) -> Result<()> {
        self.tx
            .send(point)
            .await
            .map_err(|_| MetricFlushError::Closed)
    }

    /// Enqueue a point from synchronous code, blocking the thread while the
    /// channel is full.
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub fn blocking_write(&self, point: DataPoint) -> Result<()> {
        self.tx
            .blocking_send(point)
            .map_err(|_| MetricFlushError::Closed)
    }

    /// Free slots left before writers block
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }

    /// Total capacity of the channel
    pub fn max_capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Reader side of the ingest channel
#[derive(Debug)]
pub struct IngestReceiver {
    rx: mpsc::Receiver<DataPoint>,
}

impl IngestReceiver {
    /// Next point in FIFO order; `None` once closed and empty
    pub async fn recv(&mut self) -> Option<DataPoint> {
        self.rx.recv().await
    }

    /// Refuse further writes. Points already enqueued stay readable.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
