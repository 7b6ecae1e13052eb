use crate::domain::errors::TelemetryError;
use crate::domain::ports::{HttpOutcome, HttpPoster};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// [`HttpPoster`] backed by a shared reqwest client
#[derive(Clone)]
pub struct ReqwestHttpPoster {
    client: Client,
}

impl ReqwestHttpPoster {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpPoster for ReqwestHttpPoster {
    async fn post(
        &self,
        url: &Url,
        headers: &HashMap<String, String>,
        body: Vec<u8>,
    ) -> Result<HttpOutcome, TelemetryError> {
        let mut request = self.client.post(url.clone()).body(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| TelemetryError::transport(url.as_str(), e))?;

        let status_code = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TelemetryError::transport(url.as_str(), e))?;

        debug!("POST {} -> HTTP {}", url, status_code);
        Ok(HttpOutcome::new(status_code, body))
    }
}
