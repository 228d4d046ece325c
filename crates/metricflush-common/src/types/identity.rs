//! Metric/resource identity
//!
//! Describes what a group of points measures and where it applies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// String labels attached to a metric or a monitored resource
pub type Labels = HashMap<String, String>;

/// Identity of an aggregated metric
///
/// `metric_type` example: `"custom.example.com/stores/daily_sales"`
/// `resource_type` example: `"global"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricIdentity {
    pub metric_type: String,
    pub metric_labels: Labels,
    pub resource_type: String,
    pub resource_labels: Labels,
}

impl MetricIdentity {
    pub fn new(
        metric_type: impl Into<String>,
        metric_labels: Labels,
        resource_type: impl Into<String>,
        resource_labels: Labels,
    ) -> Self {
        Self {
            metric_type: metric_type.into(),
            metric_labels,
            resource_type: resource_type.into(),
            resource_labels,
        }
    }

    /// Add a metric label
    pub fn with_metric_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metric_labels.insert(key.into(), value.into());
        self
    }

    /// Add a resource label
    pub fn with_resource_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.resource_labels.insert(key.into(), value.into());
        self
    }
}
