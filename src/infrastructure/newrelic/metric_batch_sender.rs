use crate::domain::errors::TelemetryError;
use crate::domain::ports::{HttpOutcome, HttpPoster};
use crate::domain::signals::MetricBatch;
use crate::infrastructure::newrelic::ingest_headers;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Sends metric batches to the metric API through a caller-supplied poster
#[derive(Clone)]
pub struct MetricBatchSender {
    poster: Arc<dyn HttpPoster>,
    endpoint: Url,
    api_key: String,
}

impl MetricBatchSender {
    pub fn new(poster: Arc<dyn HttpPoster>, endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            poster,
            endpoint,
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Consumes the batch; a sent batch cannot be reported twice.
    pub async fn send_batch(&self, batch: MetricBatch) -> Result<HttpOutcome, TelemetryError> {
        let count = batch.len();
        if batch.is_empty() {
            warn!("MetricBatchSender: sending empty batch to {}", self.endpoint);
        }

        let body = batch.into_payload()?;
        debug!("MetricBatchSender: {} gauges, {} bytes", count, body.len());

        let outcome = self
            .poster
            .post(&self.endpoint, &ingest_headers(&self.api_key), body)
            .await?;

        info!(
            "MetricBatchSender: {} gauges -> HTTP {}",
            count, outcome.status_code
        );
        Ok(outcome)
    }
}
