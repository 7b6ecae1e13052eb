//! Sink (New Relic) configuration parsing from environment variables.

use crate::infrastructure::newrelic::{Endpoints, Region};
use anyhow::{Context, Result};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// New Relic ingest configuration
#[derive(Clone, Default)]
pub struct SinkEnvConfig {
    pub insert_key: String,
    pub account_id: Option<String>,
    pub region: Region,
    pub metric_endpoint: Option<String>,
    pub event_endpoint: Option<String>,
    pub log_endpoint: Option<String>,
    pub trace_endpoint: Option<String>,
}

impl fmt::Debug for SinkEnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkEnvConfig")
            .field(
                "insert_key",
                &if self.insert_key.is_empty() { "<empty>" } else { "<redacted>" },
            )
            .field("account_id", &self.account_id)
            .field("region", &self.region)
            .field("metric_endpoint", &self.metric_endpoint)
            .field("event_endpoint", &self.event_endpoint)
            .field("log_endpoint", &self.log_endpoint)
            .field("trace_endpoint", &self.trace_endpoint)
            .finish()
    }
}

impl SinkEnvConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let region = match lookup("NEW_RELIC_REGION") {
            Some(raw) => Region::from_str(&raw)?,
            None => Region::default(),
        };
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            insert_key: lookup("NEW_RELIC_INSERT_KEY").unwrap_or_default().trim().to_string(),
            account_id: non_empty("NEW_RELIC_ACCOUNT_ID"),
            region,
            metric_endpoint: non_empty("NEW_RELIC_METRIC_ENDPOINT"),
            event_endpoint: non_empty("NEW_RELIC_EVENT_ENDPOINT"),
            log_endpoint: non_empty("NEW_RELIC_LOG_ENDPOINT"),
            trace_endpoint: non_empty("NEW_RELIC_TRACE_ENDPOINT"),
        })
    }

    /// Region defaults with per-signal overrides applied
    pub fn endpoints(&self) -> Result<Endpoints> {
        let mut endpoints = Endpoints::for_region(self.region, self.account_id.as_deref())?;

        if let Some(raw) = &self.metric_endpoint {
            endpoints.metrics = parse_endpoint("NEW_RELIC_METRIC_ENDPOINT", raw)?;
        }
        if let Some(raw) = &self.event_endpoint {
            endpoints.events = Some(parse_endpoint("NEW_RELIC_EVENT_ENDPOINT", raw)?);
        }
        if let Some(raw) = &self.log_endpoint {
            endpoints.logs = parse_endpoint("NEW_RELIC_LOG_ENDPOINT", raw)?;
        }
        if let Some(raw) = &self.trace_endpoint {
            endpoints.traces = parse_endpoint("NEW_RELIC_TRACE_ENDPOINT", raw)?;
        }
        Ok(endpoints)
    }
}

fn parse_endpoint(name: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).with_context(|| format!("Invalid {}: {}", name, raw))
}
