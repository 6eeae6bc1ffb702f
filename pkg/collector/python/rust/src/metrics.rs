// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::ffi::c_int;
use std::fmt;

/// Kind of a submitted metric, mirroring the runtime's `metric_type_t`.
///
/// The discriminants are the codes the runtime sends. The kind crosses the
/// boundary as a plain `c_int` and is converted with `TryFrom`, so an
/// out-of-range code never materializes as an invalid enum value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Gauge = 0,
    Rate = 1,
    Count = 2,
    MonotonicCount = 3,
    Counter = 4,
    Histogram = 5,
    Historate = 6,
}

impl MetricKind {
    pub const ALL: [MetricKind; 7] = [
        MetricKind::Gauge,
        MetricKind::Rate,
        MetricKind::Count,
        MetricKind::MonotonicCount,
        MetricKind::Counter,
        MetricKind::Histogram,
        MetricKind::Historate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Rate => "rate",
            MetricKind::Count => "count",
            MetricKind::MonotonicCount => "monotonic_count",
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
            MetricKind::Historate => "historate",
        }
    }
}

impl TryFrom<c_int> for MetricKind {
    type Error = c_int;

    fn try_from(code: c_int) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(MetricKind::Gauge),
            1 => Ok(MetricKind::Rate),
            2 => Ok(MetricKind::Count),
            3 => Ok(MetricKind::MonotonicCount),
            4 => Ok(MetricKind::Counter),
            5 => Ok(MetricKind::Histogram),
            6 => Ok(MetricKind::Historate),
            other => Err(other),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a service check.
///
/// Forwarded as received: values outside the four known statuses are not
/// rejected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceCheckStatus(pub i32);

impl ServiceCheckStatus {
    pub const OK: Self = Self(0);
    pub const WARNING: Self = Self(1);
    pub const CRITICAL: Self = Self(2);
    pub const UNKNOWN: Self = Self(3);
}

impl From<c_int> for ServiceCheckStatus {
    fn from(status: c_int) -> Self {
        Self(status)
    }
}

/// Event priority as sent by the check (`normal`, `low`, ...), uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventPriority(pub String);

/// Event alert type as sent by the check (`error`, `info`, ...), uninterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventAlertType(pub String);

/// An event assembled from a check submission.
///
/// String fields are empty when the check did not provide them. `timestamp`
/// is `None` when the check sent zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Event {
    pub title: String,
    pub text: String,
    pub timestamp: Option<i64>,
    pub priority: EventPriority,
    pub host: String,
    pub tags: Vec<String>,
    pub alert_type: EventAlertType,
    pub aggregation_key: String,
    pub source_type_name: String,
}

/// One bucket of a histogram computed on the check side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistogramBucket {
    pub name: String,
    pub value: i64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub monotonic: bool,
    pub host: String,
    pub tags: Vec<String>,
    pub flush_first_value: bool,
}
