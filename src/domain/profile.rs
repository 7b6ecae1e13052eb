use crate::domain::errors::TelemetryError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// `owner/name` pair identifying the repository being reported on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryId {
    pub owner: String,
    pub name: String,
}

impl RepositoryId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => anyhow::bail!("Invalid repository: {}. Must be 'owner/name'", s),
        }
    }
}

/// Facts extracted from a community profile document.
///
/// The two length fields are character counts of the source strings, not
/// the strings themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityProfileFacts {
    pub health_percentage: u32,
    pub description_length: u64,
    pub updated_at_length: u64,
}

impl CommunityProfileFacts {
    /// Parse a raw response body. Fails as a whole; never yields partial facts.
    pub fn from_body(body: &str) -> Result<Self, TelemetryError> {
        let document: Value = serde_json::from_str(body)
            .map_err(|e| TelemetryError::malformed(format!("body is not valid JSON: {}", e)))?;
        Self::from_json(&document)
    }

    pub fn from_json(document: &Value) -> Result<Self, TelemetryError> {
        let object = document
            .as_object()
            .ok_or_else(|| TelemetryError::malformed("body is not a JSON object"))?;

        let health = object
            .get("health_percentage")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                TelemetryError::malformed("'health_percentage' missing or not an integer")
            })?;
        if health > 100 {
            return Err(TelemetryError::malformed(format!(
                "'health_percentage' out of range: {}",
                health
            )));
        }

        Ok(Self {
            health_percentage: health as u32,
            description_length: string_len(object.get("description"), "description")?,
            updated_at_length: string_len(object.get("updated_at"), "updated_at")?,
        })
    }
}

fn string_len(field: Option<&Value>, name: &str) -> Result<u64, TelemetryError> {
    match field {
        Some(Value::String(s)) => Ok(s.chars().count() as u64),
        Some(Value::Null) | None => Err(TelemetryError::malformed(format!(
            "'{}' missing or null",
            name
        ))),
        Some(_) => Err(TelemetryError::malformed(format!(
            "'{}' is not a string",
            name
        ))),
    }
}
