use crate::config::Config;
use crate::domain::signals::SignalKind;
use std::collections::HashMap;

fn config_with(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(move |key: &str| vars.get(key).cloned())
}

#[test]
fn test_full_config_validates() {
    let config = config_with(&[
        ("GITHUB_TOKEN", "ghp_x"),
        ("GITHUB_REPOSITORY", "newrelic/node-newrelic"),
        ("NEW_RELIC_INSERT_KEY", "NRAL-x"),
        ("NEW_RELIC_ACCOUNT_ID", "4462067"),
    ])
    .unwrap();

    assert_eq!(config.source.repository.to_string(), "newrelic/node-newrelic");
    assert_eq!(config.dispatch.signals, SignalKind::ALL.to_vec());
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_insert_key_fails_validation() {
    let config = config_with(&[("NEW_RELIC_ACCOUNT_ID", "4462067")]).unwrap();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("NEW_RELIC_INSERT_KEY"));
}

#[test]
fn test_events_need_an_account_or_endpoint() {
    let config = config_with(&[("NEW_RELIC_INSERT_KEY", "NRAL-x")]).unwrap();
    assert!(config.validate().is_err());

    // metrics-only runs do not need the account id
    let config = config_with(&[("NEW_RELIC_INSERT_KEY", "NRAL-x"), ("SIGNALS", "metrics,logs")])
        .unwrap();
    assert!(config.validate().is_ok());

    let config = config_with(&[
        ("NEW_RELIC_INSERT_KEY", "NRAL-x"),
        ("NEW_RELIC_EVENT_ENDPOINT", "http://127.0.0.1:9000/events"),
    ])
    .unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn test_bad_repository_is_reported_with_context() {
    let err = config_with(&[("GITHUB_REPOSITORY", "centurion")]).unwrap_err();
    assert!(format!("{:#}", err).contains("GITHUB_REPOSITORY"));
}
