//! Dispatch configuration: which signals to send and how logs read.

use crate::domain::signals::{Severity, SignalKind};
use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

/// Dispatch environment configuration
#[derive(Debug, Clone)]
pub struct DispatchEnvConfig {
    pub signals: Vec<SignalKind>,
    pub log_message: Option<String>,
    pub log_level: Severity,
    /// `None` keeps the transport's own defaults
    pub request_timeout: Option<Duration>,
}

impl Default for DispatchEnvConfig {
    fn default() -> Self {
        Self {
            signals: SignalKind::ALL.to_vec(),
            log_message: None,
            log_level: Severity::Info,
            request_timeout: None,
        }
    }
}

impl DispatchEnvConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let signals = match lookup("SIGNALS") {
            Some(raw) => SignalKind::parse_list(&raw).context("Failed to parse SIGNALS")?,
            None => defaults.signals,
        };
        let log_level = match lookup("LOG_LEVEL") {
            Some(raw) => Severity::from_str(&raw)?,
            None => defaults.log_level,
        };
        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("Invalid REQUEST_TIMEOUT_SECS: {}", raw))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            signals,
            log_message: lookup("LOG_MESSAGE").filter(|m| !m.trim().is_empty()),
            log_level,
            request_timeout,
        })
    }
}
