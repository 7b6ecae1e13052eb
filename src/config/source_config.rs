//! Source (GitHub) configuration parsing from environment variables.

use crate::domain::profile::RepositoryId;
use crate::infrastructure::github::DEFAULT_API_BASE_URL;
use anyhow::{Context, Result};
use std::fmt;

pub const DEFAULT_REPOSITORY: &str = "newrelic/centurion";

/// GitHub community profile source configuration
#[derive(Clone)]
pub struct SourceEnvConfig {
    pub api_base_url: String,
    /// Empty means anonymous access
    pub token: String,
    pub repository: RepositoryId,
}

impl fmt::Debug for SourceEnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceEnvConfig")
            .field("api_base_url", &self.api_base_url)
            .field("token", &if self.token.is_empty() { "<empty>" } else { "<redacted>" })
            .field("repository", &self.repository)
            .finish()
    }
}

impl SourceEnvConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let repository = lookup("GITHUB_REPOSITORY")
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string())
            .parse()
            .context("Failed to parse GITHUB_REPOSITORY")?;

        Ok(Self {
            api_base_url: lookup("GITHUB_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            token: lookup("GITHUB_TOKEN").unwrap_or_default().trim().to_string(),
            repository,
        })
    }
}
