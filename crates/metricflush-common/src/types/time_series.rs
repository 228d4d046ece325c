//! Time series records sent to the backend on flush

use serde::{Deserialize, Serialize};

use super::identity::{Labels, MetricIdentity};
use super::point::DataPoint;

/// Metric descriptor of a time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(rename = "type")]
    pub metric_type: String,
    #[serde(default)]
    pub labels: Labels,
}

/// Monitored resource of a time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub labels: Labels,
}

/// One time series: identity plus the points of one flush
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub metric: Metric,
    pub resource: MonitoredResource,
    pub points: Vec<DataPoint>,
}

impl TimeSeries {
    /// Build a time series for `identity` carrying `points`
    pub fn new(identity: &MetricIdentity, points: Vec<DataPoint>) -> Self {
        Self {
            metric: Metric {
                metric_type: identity.metric_type.clone(),
                labels: identity.metric_labels.clone(),
            },
            resource: MonitoredResource {
                resource_type: identity.resource_type.clone(),
                labels: identity.resource_labels.clone(),
            },
            points,
        }
    }
}

/// Body of a `timeSeries.create` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSeriesRequest {
    pub time_series: Vec<TimeSeries>,
}

impl CreateTimeSeriesRequest {
    /// Request holding a single time series
    pub fn single(series: TimeSeries) -> Self {
        Self {
            time_series: vec![series],
        }
    }

    /// Total points across all series
    pub fn point_count(&self) -> usize {
        self.time_series.iter().map(|ts| ts.points.len()).sum()
    }
}
