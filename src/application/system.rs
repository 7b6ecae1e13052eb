use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::application::builders::LogSettings;
use crate::application::custom_event::build_custom_event;
use crate::application::dispatcher::{Dispatcher, RunReport};
use crate::config::Config;
use crate::domain::ports::{HttpOutcome, HttpPoster, ProfileSource};
use crate::infrastructure::github::community_profile_url;
use crate::infrastructure::newrelic::{MetricBatchSender, SignalSender};
use crate::infrastructure::{GitHubProfileFetcher, HttpClientFactory, ReqwestHttpPoster};

/// Fully wired pipeline: one shared HTTP client, one poster, one dispatcher.
pub struct Application {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub signal_sender: SignalSender,
}

impl Application {
    /// Wire the production adapters from configuration.
    pub fn build(config: Config) -> Result<Self> {
        let client = HttpClientFactory::create_client(config.dispatch.request_timeout);
        let url = community_profile_url(&config.source.api_base_url, &config.source.repository)?;
        let source: Arc<dyn ProfileSource> = Arc::new(GitHubProfileFetcher::new(
            client.clone(),
            url,
            config.source.token.clone(),
        ));
        let poster: Arc<dyn HttpPoster> = Arc::new(ReqwestHttpPoster::new(client));

        Self::build_with(config, source, poster)
    }

    /// Wire the pipeline around caller-supplied source and poster.
    pub fn build_with(
        config: Config,
        source: Arc<dyn ProfileSource>,
        poster: Arc<dyn HttpPoster>,
    ) -> Result<Self> {
        info!(
            "Building repopulse for {} (signals: {:?})...",
            config.source.repository, config.dispatch.signals
        );

        let endpoints = config.sink.endpoints().context("Failed to resolve sink endpoints")?;
        let metric_sender = MetricBatchSender::new(
            poster.clone(),
            endpoints.metrics.clone(),
            config.sink.insert_key.clone(),
        );
        let signal_sender = SignalSender::new(poster, endpoints, config.sink.insert_key.clone());

        let dispatcher = Dispatcher::new(
            source,
            metric_sender,
            signal_sender.clone(),
            config.source.repository.clone(),
            config.dispatch.signals.clone(),
            LogSettings {
                message: config.dispatch.log_message.clone(),
                level: config.dispatch.log_level,
            },
        );

        Ok(Self {
            config,
            dispatcher,
            signal_sender,
        })
    }

    /// One fetch → build → send pass.
    pub async fn run_once(&mut self) -> Result<RunReport> {
        self.dispatcher
            .run()
            .await
            .context("Community profile fetch failed")
    }

    /// Send one ad-hoc `eventType` event with `key=value` attributes.
    pub async fn send_custom_event(&self, event_type: &str, pairs: &[String]) -> Result<HttpOutcome> {
        let event = build_custom_event(event_type, pairs)?;
        info!("Sending custom {} event with {} attributes", event.event_type, event.attributes.len());
        let outcome = self.signal_sender.send_custom_event(&event).await?;
        Ok(outcome)
    }
}
