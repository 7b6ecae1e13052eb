use reqwest::Client;
use std::time::Duration;
use tracing::warn;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the client shared by the profile fetch and every sink.
    ///
    /// No retry layer: each run is a single best-effort pass. Without an
    /// explicit `timeout` the transport defaults apply.
    pub fn create_client(timeout: Option<Duration>) -> Client {
        let mut builder = Client::builder()
            .pool_max_idle_per_host(5)
            // GitHub rejects requests without a User-Agent
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout).connect_timeout(timeout);
        }

        builder.build().unwrap_or_else(|e| {
            warn!("HttpClientFactory: falling back to default client: {}", e);
            Client::new()
        })
    }
}
