use crate::domain::errors::TelemetryError;
use crate::domain::profile::CommunityProfileFacts;
use async_trait::async_trait;
use std::collections::HashMap;
use url::Url;

/// Terminal result of one send. Carries non-2xx answers as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOutcome {
    pub status_code: u16,
    pub body: String,
}

impl HttpOutcome {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Transport seam for every outbound payload.
///
/// Implementations must only fail on transport-level problems; a remote
/// error status is returned as an ordinary [`HttpOutcome`].
#[async_trait]
pub trait HttpPoster: Send + Sync {
    async fn post(
        &self,
        url: &Url,
        headers: &HashMap<String, String>,
        body: Vec<u8>,
    ) -> Result<HttpOutcome, TelemetryError>;
}

/// Source of community profile facts
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self) -> Result<CommunityProfileFacts, TelemetryError>;
}
