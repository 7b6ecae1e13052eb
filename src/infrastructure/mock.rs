//! In-process stand-ins for the source and the sinks.

use crate::domain::errors::TelemetryError;
use crate::domain::ports::{HttpOutcome, HttpPoster, ProfileSource};
use crate::domain::profile::CommunityProfileFacts;
use crate::infrastructure::github::facts_from_response;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: Url,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body parsed as JSON, `Null` if it is not JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone)]
enum Rule {
    Status(u16, String),
    Fail,
}

/// Poster that records every request and answers 202 unless a rule
/// matching the URL says otherwise.
#[derive(Clone, Default)]
pub struct RecordingPoster {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    rules: Vec<(String, Rule)>,
}

impl RecordingPoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `status` for URLs containing `url_fragment`
    pub fn with_status(mut self, url_fragment: &str, status: u16, body: &str) -> Self {
        self.rules
            .push((url_fragment.to_string(), Rule::Status(status, body.to_string())));
        self
    }

    /// Raise a transport error for URLs containing `url_fragment`
    pub fn failing(mut self, url_fragment: &str) -> Self {
        self.rules.push((url_fragment.to_string(), Rule::Fail));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpPoster for RecordingPoster {
    async fn post(
        &self,
        url: &Url,
        headers: &HashMap<String, String>,
        body: Vec<u8>,
    ) -> Result<HttpOutcome, TelemetryError> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(RecordedRequest {
                url: url.clone(),
                headers: headers.clone(),
                body,
            });
        }

        let rule = self
            .rules
            .iter()
            .find(|(fragment, _)| url.as_str().contains(fragment.as_str()))
            .map(|(_, rule)| rule.clone());

        match rule {
            Some(Rule::Status(status, body)) => Ok(HttpOutcome::new(status, body)),
            Some(Rule::Fail) => Err(TelemetryError::transport(url.as_str(), "connection refused")),
            None => Ok(HttpOutcome::new(202, r#"{"success":true}"#)),
        }
    }
}

/// Profile source answering a canned HTTP status and body
pub struct StaticProfileSource {
    status: u16,
    body: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticProfileSource {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self::with_response(200, body)
    }

    pub fn with_response(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Simulated latency per fetch
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileSource for StaticProfileSource {
    async fn fetch(&self) -> Result<CommunityProfileFacts, TelemetryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        facts_from_response("mock://profile", self.status, &self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_poster_rules() {
        let poster = RecordingPoster::new()
            .with_status("log-api", 500, "boom")
            .failing("trace-api");
        let headers = HashMap::new();

        tokio_test::block_on(async {
            let ok = poster
                .post(&Url::parse("https://metric-api.newrelic.com/metric/v1").unwrap(), &headers, vec![])
                .await
                .unwrap();
            assert_eq!(ok.status_code, 202);

            let rejected = poster
                .post(&Url::parse("https://log-api.newrelic.com/log/v1").unwrap(), &headers, vec![])
                .await
                .unwrap();
            assert_eq!(rejected.status_code, 500);

            let failed = poster
                .post(&Url::parse("https://trace-api.newrelic.com/trace/v1").unwrap(), &headers, vec![])
                .await;
            assert!(failed.is_err());
        });

        assert_eq!(poster.requests().len(), 3);
    }

    #[test]
    fn test_static_source_counts_calls() {
        let source = StaticProfileSource::with_response(500, "");

        let result = tokio_test::block_on(source.fetch());
        assert!(matches!(result, Err(TelemetryError::Transport { .. })));
        assert_eq!(source.calls(), 1);
    }
}
