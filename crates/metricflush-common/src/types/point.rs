//! Data points and the point factory
//!
//! A point is a gauge sample: a closed interval whose start and end are the
//! same capture instant, plus a double value. Field names serialize in the
//! camelCase shape the monitoring API expects.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Closed time interval `[start_time, end_time]`, RFC 3339 text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    pub start_time: String,
    pub end_time: String,
}

/// Typed point value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedValue {
    pub double_value: f64,
}

/// One immutable measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub interval: TimeInterval,
    pub value: TypedValue,
}

impl DataPoint {
    /// The measured value
    pub fn double_value(&self) -> f64 {
        self.value.double_value
    }
}

/// Create a data point for `value` captured now.
///
/// Start and end are both the current UTC instant with nanosecond precision.
/// No range validation is performed.
pub fn create_data_point(value: f64) -> DataPoint {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);
    DataPoint {
        interval: TimeInterval {
            start_time: now.clone(),
            end_time: now,
        },
        value: TypedValue {
            double_value: value,
        },
    }
}
