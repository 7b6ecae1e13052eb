//! Telemetry signal shapes and their JSON wire format.

use crate::domain::attributes::AttributeSet;
use crate::domain::profile::RepositoryId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four signal kinds a run can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Metrics,
    Events,
    Logs,
    Traces,
}

impl SignalKind {
    pub const ALL: [SignalKind; 4] = [Self::Metrics, Self::Events, Self::Logs, Self::Traces];

    /// Parse a comma-separated list such as `metrics,logs`. Order is normalised
    /// and duplicates dropped.
    pub fn parse_list(raw: &str) -> anyhow::Result<Vec<SignalKind>> {
        let mut kinds = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(SignalKind::from_str)
            .collect::<anyhow::Result<Vec<_>>>()?;
        kinds.sort();
        kinds.dedup();
        if kinds.is_empty() {
            anyhow::bail!("At least one signal kind must be enabled");
        }
        Ok(kinds)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metrics => write!(f, "metrics"),
            Self::Events => write!(f, "events"),
            Self::Logs => write!(f, "logs"),
            Self::Traces => write!(f, "traces"),
        }
    }
}

impl FromStr for SignalKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metrics" | "metric" => Ok(Self::Metrics),
            "events" | "event" => Ok(Self::Events),
            "logs" | "log" => Ok(Self::Logs),
            "traces" | "trace" => Ok(Self::Traces),
            _ => anyhow::bail!(
                "Invalid signal: {}. Must be 'metrics', 'events', 'logs', or 'traces'",
                s
            ),
        }
    }
}

/// Per-run context shared by every builder: one timestamp, one attribute set.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub repository: RepositoryId,
    /// Epoch milliseconds, identical on every signal of the run
    pub timestamp_ms: i64,
    /// ISO-8601 rendering of the fetch instant
    pub fetched_at: String,
    pub attributes: AttributeSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Gauge,
}

/// Point-in-time numeric reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub name: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    pub value: f64,
    pub timestamp: i64,
    pub attributes: AttributeSet,
}

impl Gauge {
    pub fn new(
        name: impl Into<String>,
        value: f64,
        timestamp: i64,
        attributes: AttributeSet,
    ) -> Self {
        Self {
            name: name.into(),
            metric_type: MetricType::Gauge,
            value,
            timestamp,
            attributes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonBlock {
    pub attributes: AttributeSet,
}

/// Ordered gauges sharing one batch-scope attribute set.
///
/// Senders take a batch by value, so a batch cannot be sent twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBatch {
    pub common: CommonBlock,
    pub metrics: Vec<Gauge>,
}

impl MetricBatch {
    pub fn new(common: AttributeSet) -> Self {
        Self {
            common: CommonBlock { attributes: common },
            metrics: Vec::new(),
        }
    }

    pub fn push(&mut self, gauge: Gauge) {
        self.metrics.push(gauge);
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Wire body: the metric API expects an array of batches.
    pub fn into_payload(self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&[self])
    }
}

/// Custom event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "eventType")]
    pub event_type: String,
    pub repository: String,
    pub health_percentage: u32,
    pub timestamp: i64,
}

/// Ad-hoc event with free-form attributes flattened beside `eventType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEvent {
    #[serde(rename = "eventType")]
    pub event_type: String,
    #[serde(flatten)]
    pub attributes: AttributeSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => anyhow::bail!(
                "Invalid log level: {}. Must be 'debug', 'info', 'warn', or 'error'",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub message: String,
    pub repository: String,
    pub level: Severity,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSpan {
    #[serde(rename = "trace.id")]
    pub trace_id: String,
    #[serde(rename = "span.id")]
    pub span_id: String,
    pub name: String,
    pub timestamp: i64,
    #[serde(rename = "duration.ms")]
    pub duration_ms: u64,
    pub repository: String,
}
