//! Monitoring client
//!
//! Factory for [`MetricAggregation`]s sharing one project, one transport and
//! one debug flag.

use async_trait::async_trait;
use metricflush_common::{DataPoint, Labels, MetricFlushError, MetricIdentity, Result};
use std::sync::Arc;
use tracing::{error, info};

use crate::aggregation::{AggregationCore, MetricAggregation};
use crate::config::{AggregationConfig, MonitoringConfig};
use crate::transport::{http::HttpTransport, TimeSeriesTransport};

/// Accepts data points for eventual delivery
#[async_trait]
pub trait MetricWriter: Send + Sync {
    async fn write(&self, point: DataPoint);
}

/// Creates writers for a metric identity
pub trait MetricCreator {
    type Writer: MetricWriter;

    fn create_metric(
        &self,
        metric_type: &str,
        metric_labels: Labels,
        resource_type: &str,
        resource_labels: Labels,
    ) -> Self::Writer;
}

/// Creates aggregations that flush to the monitoring backend
pub struct MonitoringClient {
    project_id: String,
    debug: bool,
    transport: Arc<dyn TimeSeriesTransport>,
    aggregation: AggregationConfig,
}

impl std::fmt::Debug for MonitoringClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoringClient")
            .field("project_id", &self.project_id)
            .field("debug", &self.debug)
            .field("transport", &self.transport.name())
            .field("aggregation", &self.aggregation)
            .finish()
    }
}

impl MonitoringClient {
    /// Build a client backed by the HTTP transport.
    ///
    /// Fails when the config is invalid, when no access token is configured
    /// outside debug mode, or when the HTTP client cannot be created.
    pub fn new(config: MonitoringConfig) -> Result<Self> {
        config.validate()?;

        if !config.debug && config.access_token.is_none() {
            error!(project_id = %config.project_id, "No access token for monitoring client");
            return Err(MetricFlushError::Credentials(
                "an access token is required outside debug mode".into(),
            ));
        }

        let transport = HttpTransport::new(
            config.endpoint.clone(),
            config.access_token.clone(),
            config.request_timeout,
        )
        .map_err(|e| {
            error!(error = %e, "Failed to create monitoring transport");
            e
        })?;

        info!(
            project_id = %config.project_id,
            endpoint = %config.endpoint,
            debug = config.debug,
            "Created monitoring client"
        );

        Ok(Self {
            project_id: config.project_id,
            debug: config.debug,
            transport: Arc::new(transport),
            aggregation: config.aggregation,
        })
    }

    /// Build a client around an existing transport
    pub fn with_transport(
        project_id: impl Into<String>,
        debug: bool,
        transport: Arc<dyn TimeSeriesTransport>,
        aggregation: AggregationConfig,
    ) -> Result<Self> {
        let project_id = project_id.into();
        if project_id.trim().is_empty() {
            return Err(MetricFlushError::Config("project_id is required".into()));
        }
        aggregation.validate()?;

        Ok(Self {
            project_id,
            debug,
            transport,
            aggregation,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// `projects/<project_id>`
    pub fn project_resource(&self) -> String {
        format!("projects/{}", self.project_id)
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn aggregation_config(&self) -> &AggregationConfig {
        &self.aggregation
    }

    /// Start an aggregation for `identity`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn start_aggregation(&self, identity: MetricIdentity) -> MetricAggregation {
        let core = AggregationCore::new(
            self.project_id.clone(),
            identity,
            self.debug,
            self.transport.clone(),
        );
        MetricAggregation::start(core, &self.aggregation)
    }
}

impl MetricCreator for MonitoringClient {
    type Writer = MetricAggregation;

    fn create_metric(
        &self,
        metric_type: &str,
        metric_labels: Labels,
        resource_type: &str,
        resource_labels: Labels,
    ) -> MetricAggregation {
        self.start_aggregation(MetricIdentity::new(
            metric_type,
            metric_labels,
            resource_type,
            resource_labels,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingTransport;
    use metricflush_common::create_data_point;
    use std::time::Duration;

    #[test]
    fn test_new_debug_without_token() {
        let config = MonitoringConfig {
            debug: true,
            ..MonitoringConfig::for_project("PROJECTID")
        };
        let client = MonitoringClient::new(config).unwrap();

        assert_eq!(client.project_id(), "PROJECTID");
        assert_eq!(client.project_resource(), "projects/PROJECTID");
        assert!(client.is_debug());
    }

    #[test]
    fn test_new_live_requires_token() {
        let err = MonitoringClient::new(MonitoringConfig::for_project("PROJECTID")).unwrap_err();
        assert!(matches!(err, MetricFlushError::Credentials(_)));

        let config = MonitoringConfig {
            access_token: Some("TOKEN".to_string()),
            ..MonitoringConfig::for_project("PROJECTID")
        };
        assert!(MonitoringClient::new(config).is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = MonitoringClient::new(MonitoringConfig::default()).unwrap_err();
        assert!(matches!(err, MetricFlushError::Config(_)));

        let err = MonitoringClient::with_transport(
            "PROJECTID",
            false,
            RecordingTransport::new(),
            AggregationConfig {
                channel_capacity: 0,
                ..AggregationConfig::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, MetricFlushError::Config(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_metric() {
        let transport = RecordingTransport::new();
        let client = MonitoringClient::with_transport(
            "PROJECTID",
            false,
            transport.clone(),
            AggregationConfig {
                flush_interval: Duration::from_secs(5),
                ..AggregationConfig::default()
            },
        )
        .unwrap();

        let aggregation = client.create_metric("METRICTYPE", Labels::new(), "RESOURCETYPE", Labels::new());
        assert_eq!(aggregation.project_id(), "PROJECTID");
        assert_eq!(aggregation.identity().metric_type, "METRICTYPE");
        assert_eq!(aggregation.flush_interval(), Duration::from_secs(5));

        MetricWriter::write(&aggregation, create_data_point(1.5)).await;
        tokio::time::sleep(Duration::from_secs(6)).await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1.time_series[0].points[0].double_value(), 1.5);
    }
}
