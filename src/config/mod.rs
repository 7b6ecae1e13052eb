//! Configuration module for repopulse.
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honoured by the binaries), organised by concern: Source, Sink and Dispatch.
//! Secrets never have compiled-in defaults.

mod dispatch_config;
mod sink_config;
mod source_config;

pub use dispatch_config::DispatchEnvConfig;
pub use sink_config::SinkEnvConfig;
pub use source_config::{DEFAULT_REPOSITORY, SourceEnvConfig};

use crate::domain::signals::SignalKind;
use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceEnvConfig,
    pub sink: SinkEnvConfig,
    pub dispatch: DispatchEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            source: SourceEnvConfig::from_lookup(&lookup).context("Failed to load source config")?,
            sink: SinkEnvConfig::from_lookup(&lookup).context("Failed to load sink config")?,
            dispatch: DispatchEnvConfig::from_lookup(&lookup)
                .context("Failed to load dispatch config")?,
        })
    }

    /// Checks that every enabled signal can actually be delivered.
    pub fn validate(&self) -> Result<()> {
        if self.sink.insert_key.is_empty() {
            anyhow::bail!("NEW_RELIC_INSERT_KEY is required to send telemetry");
        }
        let endpoints = self.sink.endpoints()?;
        if self.dispatch.signals.contains(&SignalKind::Events) && endpoints.events.is_none() {
            anyhow::bail!(
                "Events are enabled but neither NEW_RELIC_ACCOUNT_ID nor NEW_RELIC_EVENT_ENDPOINT is set"
            );
        }
        Ok(())
    }
}
