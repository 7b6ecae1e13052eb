use crate::domain::errors::TelemetryError;
use crate::domain::ports::{HttpOutcome, HttpPoster};
use crate::domain::signals::{CustomEvent, Event, LogRecord, TraceSpan};
use crate::infrastructure::newrelic::{Endpoints, ingest_headers};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Posts single event, log and trace records to their ingest endpoints
#[derive(Clone)]
pub struct SignalSender {
    poster: Arc<dyn HttpPoster>,
    endpoints: Endpoints,
    api_key: String,
}

impl SignalSender {
    pub fn new(poster: Arc<dyn HttpPoster>, endpoints: Endpoints, api_key: impl Into<String>) -> Self {
        Self {
            poster,
            endpoints,
            api_key: api_key.into(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn send_event(&self, event: &Event) -> Result<HttpOutcome, TelemetryError> {
        let url = self.events_url()?;
        self.post_json("Event", url, event).await
    }

    pub async fn send_custom_event(&self, event: &CustomEvent) -> Result<HttpOutcome, TelemetryError> {
        let url = self.events_url()?;
        self.post_json("Event", url, event).await
    }

    pub async fn send_log(&self, log: &LogRecord) -> Result<HttpOutcome, TelemetryError> {
        self.post_json("Log", &self.endpoints.logs, log).await
    }

    pub async fn send_trace(&self, span: &TraceSpan) -> Result<HttpOutcome, TelemetryError> {
        self.post_json("Trace", &self.endpoints.traces, span).await
    }

    fn events_url(&self) -> Result<&Url, TelemetryError> {
        self.endpoints
            .events
            .as_ref()
            .ok_or_else(|| TelemetryError::MissingEndpoint {
                signal: "events".to_string(),
            })
    }

    async fn post_json<T: Serialize>(
        &self,
        label: &str,
        url: &Url,
        payload: &T,
    ) -> Result<HttpOutcome, TelemetryError> {
        let body = serde_json::to_vec(payload)?;
        let outcome = self
            .poster
            .post(url, &ingest_headers(&self.api_key), body)
            .await?;
        info!("{} response: HTTP {} {}", label, outcome.status_code, outcome.body);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attributes::AttributeSet;
    use crate::domain::signals::Severity;
    use crate::infrastructure::mock::RecordingPoster;
    use crate::infrastructure::newrelic::Region;

    fn sender(poster: Arc<RecordingPoster>, account: Option<&str>) -> SignalSender {
        let endpoints = Endpoints::for_region(Region::Us, account).unwrap();
        SignalSender::new(poster, endpoints, "insert-key")
    }

    #[tokio::test]
    async fn test_each_record_goes_to_its_endpoint() {
        let poster = Arc::new(RecordingPoster::new());
        let sender = sender(poster.clone(), Some("4462067"));

        let event = Event {
            event_type: "GitHubEvent".to_string(),
            repository: "newrelic/centurion".to_string(),
            health_percentage: 87,
            timestamp: 7,
        };
        let log = LogRecord {
            message: "m".to_string(),
            repository: "newrelic/centurion".to_string(),
            level: Severity::Info,
            timestamp: 7,
        };
        let span = TraceSpan {
            trace_id: "t".to_string(),
            span_id: "s".to_string(),
            name: "n".to_string(),
            timestamp: 7,
            duration_ms: 3,
            repository: "newrelic/centurion".to_string(),
        };

        sender.send_event(&event).await.unwrap();
        sender.send_log(&log).await.unwrap();
        sender.send_trace(&span).await.unwrap();

        let hosts: Vec<String> = poster
            .requests()
            .iter()
            .map(|r| r.url.host_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(
            hosts,
            vec![
                "insights-collector.newrelic.com",
                "log-api.newrelic.com",
                "trace-api.newrelic.com"
            ]
        );
        assert!(poster.requests().iter().all(|r| r.headers["Api-Key"] == "insert-key"));
        assert_eq!(poster.requests()[0].json()["eventType"], "GitHubEvent");
    }

    #[tokio::test]
    async fn test_events_without_account_fail_without_posting() {
        let poster = Arc::new(RecordingPoster::new());
        let sender = sender(poster.clone(), None);

        let event = CustomEvent {
            event_type: "Purchase".to_string(),
            attributes: AttributeSet::new().with("amount", 400i64),
        };

        let err = sender.send_custom_event(&event).await.unwrap_err();
        assert!(matches!(err, TelemetryError::MissingEndpoint { .. }));
        assert!(poster.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let poster = Arc::new(RecordingPoster::new().failing("log-api"));
        let sender = sender(poster, None);

        let log = LogRecord {
            message: "m".to_string(),
            repository: "r".to_string(),
            level: Severity::Error,
            timestamp: 1,
        };

        assert!(matches!(
            sender.send_log(&log).await,
            Err(TelemetryError::Transport { .. })
        ));
    }
}
