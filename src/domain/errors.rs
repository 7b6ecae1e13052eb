use thiserror::Error;

/// Errors raised while fetching the source profile or talking to a sink.
///
/// Non-2xx answers from a sink are not errors: they come back as an
/// [`HttpOutcome`](crate::domain::ports::HttpOutcome) for the caller to judge.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Transport failure for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error("Authentication rejected by {url} (HTTP {status})")]
    Authentication { url: String, status: u16 },

    #[error("No endpoint configured for {signal}")]
    MissingEndpoint { signal: String },

    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TelemetryError {
    pub fn transport(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }
}
