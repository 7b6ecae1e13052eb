use crate::domain::errors::TelemetryError;
use crate::domain::ports::ProfileSource;
use crate::domain::profile::{CommunityProfileFacts, RepositoryId};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::info;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// `<base>/repos/<owner>/<name>/community/profile`
pub fn community_profile_url(base_url: &str, repository: &RepositoryId) -> anyhow::Result<Url> {
    let mut url = Url::parse(base_url)
        .with_context(|| format!("Invalid GitHub API base URL: {}", base_url))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("GitHub API base URL cannot be a base: {}", base_url))?
        .pop_if_empty()
        .extend([
            "repos",
            repository.owner.as_str(),
            repository.name.as_str(),
            "community",
            "profile",
        ]);
    Ok(url)
}

/// Turn a source answer into facts, or the matching error.
///
/// 401/403 are authentication failures; any other non-2xx status counts as
/// a transport failure since no usable document arrived.
pub fn facts_from_response(
    url: &str,
    status: u16,
    body: &str,
) -> Result<CommunityProfileFacts, TelemetryError> {
    match status {
        200..=299 => CommunityProfileFacts::from_body(body),
        401 | 403 => Err(TelemetryError::Authentication {
            url: url.to_string(),
            status,
        }),
        _ => Err(TelemetryError::transport(
            url,
            format!("source returned HTTP {}", status),
        )),
    }
}

/// Community profile fetcher for the GitHub REST API
pub struct GitHubProfileFetcher {
    client: Client,
    url: Url,
    token: String,
}

impl GitHubProfileFetcher {
    pub fn new(client: Client, url: Url, token: impl Into<String>) -> Self {
        Self {
            client,
            url,
            token: token.into(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// One GET, no retry. An empty token means anonymous access and the
    /// `Authorization` header is left off.
    pub async fn fetch_profile(
        client: &Client,
        url: &Url,
        token: &str,
    ) -> Result<CommunityProfileFacts, TelemetryError> {
        let mut request = client
            .get(url.clone())
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if !token.is_empty() {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| TelemetryError::transport(url.as_str(), e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TelemetryError::transport(url.as_str(), e))?;

        facts_from_response(url.as_str(), status, &body)
    }
}

#[async_trait]
impl ProfileSource for GitHubProfileFetcher {
    async fn fetch(&self) -> Result<CommunityProfileFacts, TelemetryError> {
        info!("Fetching community profile from {}...", self.url);
        let facts = Self::fetch_profile(&self.client, &self.url, &self.token).await?;
        info!(
            "Fetched profile: health {}% | description {} chars | updated_at {} chars",
            facts.health_percentage, facts.description_length, facts.updated_at_length
        );
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_community_profile_url() {
        let repo = RepositoryId::new("newrelic", "centurion");

        let url = community_profile_url(DEFAULT_API_BASE_URL, &repo).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/newrelic/centurion/community/profile"
        );

        let url = community_profile_url("http://127.0.0.1:8080/api/", &repo).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/api/repos/newrelic/centurion/community/profile"
        );

        assert!(community_profile_url("not a url", &repo).is_err());
    }

    #[test]
    fn test_server_error_is_transport_failure() {
        let err = facts_from_response("https://api.github.com/x", 500, "oops").unwrap_err();
        assert!(matches!(err, TelemetryError::Transport { .. }));
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_forbidden_is_authentication_failure() {
        for status in [401, 403] {
            let err = facts_from_response("https://api.github.com/x", status, "").unwrap_err();
            assert!(matches!(err, TelemetryError::Authentication { .. }));
        }
    }

    #[test]
    fn test_success_parses_body() {
        let facts = facts_from_response(
            "https://api.github.com/x",
            200,
            r#"{"health_percentage": 100, "description": "abc", "updated_at": "now"}"#,
        )
        .unwrap();

        assert_eq!(facts.health_percentage, 100);
        assert_eq!(facts.description_length, 3);
        assert_eq!(facts.updated_at_length, 3);
    }
}
