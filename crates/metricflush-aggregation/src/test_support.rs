//! Test doubles: recording transports and a capturing tracing layer

use async_trait::async_trait;
use metricflush_common::{CreateTimeSeriesRequest, MetricFlushError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::transport::TimeSeriesTransport;

/// Records every call; fails each one when `fail` is set
#[derive(Default)]
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<(String, CreateTimeSeriesRequest)>>,
    fail: bool,
    gate: Option<Semaphore>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    /// Each call waits for a permit added through `release`
    pub(crate) fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        })
    }

    pub(crate) fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub(crate) fn requests(&self) -> Vec<(String, CreateTimeSeriesRequest)> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TimeSeriesTransport for RecordingTransport {
    async fn create_time_series(
        &self,
        project_resource: &str,
        request: &CreateTimeSeriesRequest,
    ) -> Result<()> {
        self.requests
            .lock()
            .push((project_resource.to_string(), request.clone()));

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| MetricFlushError::Internal(e.to_string()))?
                .forget();
        }

        if self.fail {
            Err(MetricFlushError::Transport("ERROR".into()))
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// One captured log event
#[derive(Debug, Clone)]
pub(crate) struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    pub(crate) fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Layer that keeps every event it sees
#[derive(Clone, Default)]
pub(crate) struct CapturedEvents {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedEvents {
    /// Install as the thread's default subscriber until the guard drops
    pub(crate) fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        use tracing_subscriber::layer::SubscriberExt;

        let captured = Self::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (captured, guard)
    }

    pub(crate) fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    pub(crate) fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }
}
