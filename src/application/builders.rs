//! Pure signal constructors.
//!
//! Every builder takes the run's [`RunContext`] by reference so that all
//! signals of one run share a timestamp and attribute set. No I/O here.

use crate::domain::attributes::AttributeSet;
use crate::domain::profile::{CommunityProfileFacts, RepositoryId};
use crate::domain::signals::{Event, Gauge, LogRecord, MetricBatch, RunContext, Severity, TraceSpan};
use std::time::Duration;

pub const SOURCE_NAME: &str = "github";
pub const HEALTH_PERCENTAGE_METRIC: &str = "github.community.health_percentage";
pub const DESCRIPTION_LENGTH_METRIC: &str = "github.community.description_length";
pub const UPDATED_AT_LENGTH_METRIC: &str = "github.community.updated_at_length";
pub const EVENT_TYPE: &str = "GitHubEvent";
pub const FETCH_SPAN_NAME: &str = "Fetch GitHub Community Profile";

/// Attributes attached to every metric of a run
pub fn run_attributes(repository: &RepositoryId, fetched_at: &str) -> AttributeSet {
    AttributeSet::new()
        .with("repository.owner", repository.owner.as_str())
        .with("repository.name", repository.name.as_str())
        .with("source", SOURCE_NAME)
        .with("fetched_at", fetched_at)
}

/// Batch-scope attributes, separate from the per-metric set
pub fn batch_common_attributes() -> AttributeSet {
    AttributeSet::new().with("source", SOURCE_NAME)
}

pub fn build_metric_batch(facts: &CommunityProfileFacts, ctx: &RunContext) -> MetricBatch {
    let mut batch = MetricBatch::new(batch_common_attributes());
    let readings = [
        (HEALTH_PERCENTAGE_METRIC, f64::from(facts.health_percentage)),
        (DESCRIPTION_LENGTH_METRIC, facts.description_length as f64),
        (UPDATED_AT_LENGTH_METRIC, facts.updated_at_length as f64),
    ];
    for (name, value) in readings {
        batch.push(Gauge::new(
            name,
            value,
            ctx.timestamp_ms,
            ctx.attributes.clone(),
        ));
    }
    batch
}

pub fn build_event(facts: &CommunityProfileFacts, ctx: &RunContext) -> Event {
    Event {
        event_type: EVENT_TYPE.to_string(),
        repository: ctx.repository.to_string(),
        health_percentage: facts.health_percentage,
        timestamp: ctx.timestamp_ms,
    }
}

/// Log message and level; the message falls back to a facts summary.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub message: Option<String>,
    pub level: Severity,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            message: None,
            level: Severity::Info,
        }
    }
}

pub fn build_log(facts: &CommunityProfileFacts, ctx: &RunContext, settings: &LogSettings) -> LogRecord {
    let message = settings.message.clone().unwrap_or_else(|| {
        format!(
            "Community profile for {}: health {}%, description {} chars, updated_at {} chars",
            ctx.repository,
            facts.health_percentage,
            facts.description_length,
            facts.updated_at_length
        )
    });

    LogRecord {
        message,
        repository: ctx.repository.to_string(),
        level: settings.level,
        timestamp: ctx.timestamp_ms,
    }
}

/// Span for the profile fetch. `fetch_elapsed` is the measured duration.
pub fn build_trace_span(ctx: &RunContext, fetch_elapsed: Duration) -> TraceSpan {
    TraceSpan {
        trace_id: hex::encode(rand::random::<[u8; 16]>()),
        span_id: hex::encode(rand::random::<[u8; 8]>()),
        name: FETCH_SPAN_NAME.to_string(),
        timestamp: ctx.timestamp_ms,
        duration_ms: u64::try_from(fetch_elapsed.as_millis()).unwrap_or(u64::MAX),
        repository: ctx.repository.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attributes::AttributeValue;

    fn context() -> RunContext {
        let repository = RepositoryId::new("newrelic", "centurion");
        let fetched_at = "2024-01-01T00:00:00.000Z".to_string();
        RunContext {
            attributes: run_attributes(&repository, &fetched_at),
            repository,
            timestamp_ms: 1_704_067_200_000,
            fetched_at,
        }
    }

    fn facts() -> CommunityProfileFacts {
        CommunityProfileFacts {
            health_percentage: 87,
            description_length: 12,
            updated_at_length: 20,
        }
    }

    #[test]
    fn test_metric_batch_has_three_gauges() {
        let ctx = context();
        let batch = build_metric_batch(&facts(), &ctx);

        let names: Vec<&str> = batch.metrics.iter().map(|g| g.name.as_str()).collect();
        let values: Vec<f64> = batch.metrics.iter().map(|g| g.value).collect();

        assert_eq!(
            names,
            vec![
                HEALTH_PERCENTAGE_METRIC,
                DESCRIPTION_LENGTH_METRIC,
                UPDATED_AT_LENGTH_METRIC
            ]
        );
        assert_eq!(values, vec![87.0, 12.0, 20.0]);
        assert!(batch.metrics.iter().all(|g| g.timestamp == ctx.timestamp_ms));
        assert_eq!(
            batch.common.attributes.get("source"),
            Some(&AttributeValue::from("github"))
        );
    }

    #[test]
    fn test_gauges_carry_run_attributes() {
        let ctx = context();
        let batch = build_metric_batch(&facts(), &ctx);

        for gauge in &batch.metrics {
            assert_eq!(gauge.attributes, ctx.attributes);
            assert_eq!(
                gauge.attributes.get("repository.owner"),
                Some(&AttributeValue::from("newrelic"))
            );
            assert_eq!(
                gauge.attributes.get("fetched_at"),
                Some(&AttributeValue::from("2024-01-01T00:00:00.000Z"))
            );
        }
    }

    #[test]
    fn test_all_builders_share_timestamp() {
        let ctx = context();
        let f = facts();

        let batch = build_metric_batch(&f, &ctx);
        let event = build_event(&f, &ctx);
        let log = build_log(&f, &ctx, &LogSettings::default());
        let span = build_trace_span(&ctx, Duration::from_millis(5));

        assert!(batch.metrics.iter().all(|g| g.timestamp == ctx.timestamp_ms));
        assert_eq!(event.timestamp, ctx.timestamp_ms);
        assert_eq!(log.timestamp, ctx.timestamp_ms);
        assert_eq!(span.timestamp, ctx.timestamp_ms);
    }

    #[test]
    fn test_event_shape() {
        let event = build_event(&facts(), &context());

        assert_eq!(event.event_type, "GitHubEvent");
        assert_eq!(event.repository, "newrelic/centurion");
        assert_eq!(event.health_percentage, 87);
    }

    #[test]
    fn test_log_message_defaults_to_summary() {
        let log = build_log(&facts(), &context(), &LogSettings::default());
        assert!(log.message.contains("newrelic/centurion"));
        assert!(log.message.contains("87%"));
        assert_eq!(log.level, Severity::Info);

        let custom = LogSettings {
            message: Some("deploy finished".to_string()),
            level: Severity::Warn,
        };
        let log = build_log(&facts(), &context(), &custom);
        assert_eq!(log.message, "deploy finished");
        assert_eq!(log.level, Severity::Warn);
    }

    #[test]
    fn test_trace_ids_are_random_hex() {
        let ctx = context();
        let a = build_trace_span(&ctx, Duration::from_millis(250));
        let b = build_trace_span(&ctx, Duration::from_millis(250));

        assert_eq!(a.trace_id.len(), 32);
        assert_eq!(a.span_id.len(), 16);
        assert!(a.trace_id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.trace_id, b.trace_id);
        assert_ne!(a.span_id, b.span_id);
        assert_eq!(a.duration_ms, 250);
        assert_eq!(a.name, FETCH_SPAN_NAME);
    }
}
