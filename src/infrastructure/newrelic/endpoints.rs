use std::str::FromStr;
use url::Url;

/// Data center region selecting the default ingest hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Us,
    Eu,
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            _ => anyhow::bail!("Invalid NEW_RELIC_REGION: {}. Must be 'us' or 'eu'", s),
        }
    }
}

/// Resolved ingest URL per signal kind.
///
/// The events endpoint is account-scoped, so it stays `None` until an
/// account id or an explicit override is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub metrics: Url,
    pub events: Option<Url>,
    pub logs: Url,
    pub traces: Url,
}

impl Endpoints {
    pub fn for_region(region: Region, account_id: Option<&str>) -> anyhow::Result<Self> {
        let (metrics, events_host, logs, traces) = match region {
            Region::Us => (
                "https://metric-api.newrelic.com/metric/v1",
                "https://insights-collector.newrelic.com",
                "https://log-api.newrelic.com/log/v1",
                "https://trace-api.newrelic.com/trace/v1",
            ),
            Region::Eu => (
                "https://metric-api.eu.newrelic.com/metric/v1",
                "https://insights-collector.eu01.nr-data.net",
                "https://log-api.eu.newrelic.com/log/v1",
                "https://trace-api.eu.newrelic.com/trace/v1",
            ),
        };

        let events = match account_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => {
                if !id.chars().all(|c| c.is_ascii_digit()) {
                    anyhow::bail!("Invalid NEW_RELIC_ACCOUNT_ID: {}. Must be numeric", id);
                }
                Some(Url::parse(&format!("{}/v1/accounts/{}/events", events_host, id))?)
            }
            None => None,
        };

        Ok(Self {
            metrics: Url::parse(metrics)?,
            events,
            logs: Url::parse(logs)?,
            traces: Url::parse(traces)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_endpoints() {
        let endpoints = Endpoints::for_region(Region::Us, Some("4462067")).unwrap();

        assert_eq!(endpoints.metrics.as_str(), "https://metric-api.newrelic.com/metric/v1");
        assert_eq!(
            endpoints.events.unwrap().as_str(),
            "https://insights-collector.newrelic.com/v1/accounts/4462067/events"
        );
        assert_eq!(endpoints.logs.as_str(), "https://log-api.newrelic.com/log/v1");
        assert_eq!(endpoints.traces.as_str(), "https://trace-api.newrelic.com/trace/v1");
    }

    #[test]
    fn test_eu_endpoints() {
        let endpoints = Endpoints::for_region(Region::Eu, None).unwrap();

        assert!(endpoints.metrics.as_str().contains(".eu."));
        assert!(endpoints.events.is_none());
    }

    #[test]
    fn test_account_id_must_be_numeric() {
        assert!(Endpoints::for_region(Region::Us, Some("abc/../x")).is_err());
        assert!(Endpoints::for_region(Region::Us, Some("  ")).unwrap().events.is_none());
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!("EU".parse::<Region>().unwrap(), Region::Eu);
        assert!("apac".parse::<Region>().is_err());
    }
}
