//! Agent configuration
//!
//! Defaults, overridden by an optional `.env` file and then by
//! `METRICFLUSH_*` environment variables.

use anyhow::{bail, Context, Result};
use metricflush_aggregation::{
    AggregationConfig, Labels, MetricIdentity, MonitoringConfig, DEFAULT_CHANNEL_CAPACITY,
    DEFAULT_ENDPOINT, DEFAULT_FLUSH_INTERVAL, DEFAULT_REQUEST_TIMEOUT,
};
use std::time::Duration;

/// Agent configuration
#[derive(Clone)]
pub struct AgentConfig {
    /// Project the time series are written to
    pub project_id: String,
    /// Log flushes instead of sending them
    pub debug: bool,
    /// Monitoring API root
    pub endpoint: String,
    /// Bearer token for the monitoring API
    pub access_token: Option<String>,
    pub request_timeout_secs: u64,
    pub flush_interval_secs: u64,
    pub channel_capacity: usize,
    /// Metric written by the agent
    pub metric_type: String,
    pub metric_labels: Labels,
    pub resource_type: String,
    pub resource_labels: Labels,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            debug: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL.as_secs(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            metric_type: "custom.googleapis.com/metricflush/sample".to_string(),
            metric_labels: Labels::new(),
            resource_type: "global".to_string(),
            resource_labels: Labels::new(),
        }
    }
}

// The token stays out of logs
impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("project_id", &self.project_id)
            .field("debug", &self.debug)
            .field("endpoint", &self.endpoint)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("flush_interval_secs", &self.flush_interval_secs)
            .field("channel_capacity", &self.channel_capacity)
            .field("metric_type", &self.metric_type)
            .field("metric_labels", &self.metric_labels)
            .field("resource_type", &self.resource_type)
            .field("resource_labels", &self.resource_labels)
            .finish()
    }
}

impl AgentConfig {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a variable lookup; unset variables keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(val) = lookup("METRICFLUSH_PROJECT_ID") {
            cfg.project_id = val;
        }
        if let Some(val) = lookup("METRICFLUSH_DEBUG") {
            cfg.debug = parse_bool(&val).context("METRICFLUSH_DEBUG")?;
        }
        if let Some(val) = lookup("METRICFLUSH_ENDPOINT") {
            cfg.endpoint = val;
        }
        if let Some(val) = lookup("METRICFLUSH_ACCESS_TOKEN") {
            if !val.is_empty() {
                cfg.access_token = Some(val);
            }
        }
        if let Some(val) = lookup("METRICFLUSH_REQUEST_TIMEOUT_SECS") {
            cfg.request_timeout_secs = val
                .parse()
                .with_context(|| format!("METRICFLUSH_REQUEST_TIMEOUT_SECS: invalid value {:?}", val))?;
        }

        // Aggregation settings
        if let Some(val) = lookup("METRICFLUSH_FLUSH_INTERVAL_SECS") {
            cfg.flush_interval_secs = val
                .parse()
                .with_context(|| format!("METRICFLUSH_FLUSH_INTERVAL_SECS: invalid value {:?}", val))?;
        }
        if let Some(val) = lookup("METRICFLUSH_CHANNEL_CAPACITY") {
            cfg.channel_capacity = val
                .parse()
                .with_context(|| format!("METRICFLUSH_CHANNEL_CAPACITY: invalid value {:?}", val))?;
        }

        // Identity
        if let Some(val) = lookup("METRICFLUSH_METRIC_TYPE") {
            cfg.metric_type = val;
        }
        if let Some(val) = lookup("METRICFLUSH_METRIC_LABELS") {
            cfg.metric_labels = parse_labels(&val).context("METRICFLUSH_METRIC_LABELS")?;
        }
        if let Some(val) = lookup("METRICFLUSH_RESOURCE_TYPE") {
            cfg.resource_type = val;
        }
        if let Some(val) = lookup("METRICFLUSH_RESOURCE_LABELS") {
            cfg.resource_labels = parse_labels(&val).context("METRICFLUSH_RESOURCE_LABELS")?;
        }

        Ok(cfg)
    }

    /// Settings for the monitoring client
    pub fn monitoring(&self) -> MonitoringConfig {
        MonitoringConfig {
            project_id: self.project_id.clone(),
            debug: self.debug,
            endpoint: self.endpoint.clone(),
            access_token: self.access_token.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            aggregation: AggregationConfig {
                flush_interval: Duration::from_secs(self.flush_interval_secs),
                channel_capacity: self.channel_capacity,
            },
        }
    }

    /// Identity of the metric the agent writes
    pub fn identity(&self) -> MetricIdentity {
        MetricIdentity::new(
            self.metric_type.clone(),
            self.metric_labels.clone(),
            self.resource_type.clone(),
            self.resource_labels.clone(),
        )
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean, got {:?}", other),
    }
}

/// Parse `key=value` pairs separated by commas
pub fn parse_labels(raw: &str) -> Result<Labels> {
    let mut labels = Labels::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("label {:?} is not of the form key=value", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("label {:?} has an empty key", pair);
        }
        labels.insert(key.to_string(), value.trim().to_string());
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = AgentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.flush_interval_secs, 60);
        assert_eq!(cfg.channel_capacity, 1000);
        assert_eq!(cfg.resource_type, "global");
        assert!(!cfg.debug);
        assert!(cfg.access_token.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let cfg = AgentConfig::from_lookup(lookup(&[
            ("METRICFLUSH_PROJECT_ID", "PROJECTID"),
            ("METRICFLUSH_DEBUG", "true"),
            ("METRICFLUSH_FLUSH_INTERVAL_SECS", "10"),
            ("METRICFLUSH_CHANNEL_CAPACITY", "50"),
            ("METRICFLUSH_METRIC_TYPE", "METRICTYPE"),
            ("METRICFLUSH_METRIC_LABELS", "store=berlin, tier=gold"),
            ("METRICFLUSH_ACCESS_TOKEN", "TOKEN"),
        ]))
        .unwrap();

        let monitoring = cfg.monitoring();
        assert_eq!(monitoring.project_id, "PROJECTID");
        assert!(monitoring.debug);
        assert_eq!(monitoring.access_token.as_deref(), Some("TOKEN"));
        assert_eq!(monitoring.aggregation.flush_interval, Duration::from_secs(10));
        assert_eq!(monitoring.aggregation.channel_capacity, 50);

        let identity = cfg.identity();
        assert_eq!(identity.metric_type, "METRICTYPE");
        assert_eq!(identity.metric_labels.get("tier").map(String::as_str), Some("gold"));
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(AgentConfig::from_lookup(lookup(&[("METRICFLUSH_CHANNEL_CAPACITY", "lots")])).is_err());
        assert!(AgentConfig::from_lookup(lookup(&[("METRICFLUSH_DEBUG", "maybe")])).is_err());
    }

    #[test]
    fn test_parse_labels() {
        let labels = parse_labels("a=1,b = 2,,").unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("b").map(String::as_str), Some("2"));

        assert!(parse_labels("").unwrap().is_empty());
        assert!(parse_labels("novalue").is_err());
        assert!(parse_labels("=x").is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let cfg = AgentConfig {
            access_token: Some("secret-token".to_string()),
            ..AgentConfig::default()
        };
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
