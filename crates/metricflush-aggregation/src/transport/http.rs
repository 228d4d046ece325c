//! HTTP transport for the Cloud Monitoring v3 REST API

use async_trait::async_trait;
use metricflush_common::{CreateTimeSeriesRequest, MetricFlushError, Result};
use std::time::Duration;
use tracing::{debug, instrument};

use super::TimeSeriesTransport;

/// Posts time series as JSON to `<endpoint>/v3/<project_resource>/timeSeries`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
}

impl HttpTransport {
    /// Create a transport; `access_token` is sent as a bearer token when set
    pub fn new(
        endpoint: impl Into<String>,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MetricFlushError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            access_token,
        })
    }

    /// URL of the `timeSeries.create` call for a project
    pub fn time_series_url(&self, project_resource: &str) -> String {
        format!(
            "{}/v3/{}/timeSeries",
            self.endpoint.trim_end_matches('/'),
            project_resource
        )
    }
}

#[async_trait]
impl TimeSeriesTransport for HttpTransport {
    #[instrument(skip(self, request), fields(points = request.point_count()))]
    async fn create_time_series(
        &self,
        project_resource: &str,
        request: &CreateTimeSeriesRequest,
    ) -> Result<()> {
        let mut builder = self
            .client
            .post(self.time_series_url(project_resource))
            .json(request);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| MetricFlushError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), "Time series written");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MetricFlushError::Backend {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn name(&self) -> &str {
        "http"
    }
}
