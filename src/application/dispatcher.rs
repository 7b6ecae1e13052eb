//! Fetch → build → send, once per run.
//!
//! A fetch failure aborts the run before any sink is touched. Once facts are
//! in hand, every enabled signal kind is sent independently: one sink
//! failing never stops the next one from being attempted.

use crate::application::builders::{
    LogSettings, build_event, build_log, build_metric_batch, build_trace_span, run_attributes,
};
use crate::application::clock::RunTimestamp;
use crate::domain::errors::TelemetryError;
use crate::domain::ports::{HttpOutcome, ProfileSource};
use crate::domain::profile::{CommunityProfileFacts, RepositoryId};
use crate::domain::signals::{Event, LogRecord, MetricBatch, RunContext, SignalKind, TraceSpan};
use crate::infrastructure::newrelic::{MetricBatchSender, SignalSender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Fetching,
    Building,
    Sending(SignalKind),
    Done,
    Failed,
}

/// Outcome of one signal kind's send
#[derive(Debug)]
pub struct SignalReport {
    pub kind: SignalKind,
    pub result: Result<HttpOutcome, TelemetryError>,
}

impl SignalReport {
    pub fn succeeded(&self) -> bool {
        matches!(&self.result, Ok(outcome) if outcome.is_success())
    }

    pub fn status_line(&self) -> String {
        match &self.result {
            Ok(outcome) if outcome.is_success() => {
                format!("{}: sent (HTTP {})", self.kind, outcome.status_code)
            }
            Ok(outcome) => format!(
                "{}: rejected (HTTP {}) {}",
                self.kind, outcome.status_code, outcome.body
            ),
            Err(e) => format!("{}: failed ({})", self.kind, e),
        }
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub repository: RepositoryId,
    pub timestamp_ms: i64,
    pub facts: CommunityProfileFacts,
    pub fetch_elapsed: Duration,
    pub signals: Vec<SignalReport>,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.signals.iter().all(SignalReport::succeeded)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SignalReport> {
        self.signals.iter().filter(|r| !r.succeeded())
    }
}

/// Payload built for one signal kind, waiting to be sent
enum BuiltSignal {
    Metrics(MetricBatch),
    Event(Event),
    Log(LogRecord),
    Trace(TraceSpan),
}

pub struct Dispatcher {
    source: Arc<dyn ProfileSource>,
    metric_sender: MetricBatchSender,
    signal_sender: SignalSender,
    repository: RepositoryId,
    signals: Vec<SignalKind>,
    log_settings: LogSettings,
    state: DispatchState,
}

impl Dispatcher {
    pub fn new(
        source: Arc<dyn ProfileSource>,
        metric_sender: MetricBatchSender,
        signal_sender: SignalSender,
        repository: RepositoryId,
        signals: Vec<SignalKind>,
        log_settings: LogSettings,
    ) -> Self {
        Self {
            source,
            metric_sender,
            signal_sender,
            repository,
            signals,
            log_settings,
            state: DispatchState::Idle,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn signals(&self) -> &[SignalKind] {
        &self.signals
    }

    fn transition(&mut self, next: DispatchState) {
        debug!("Dispatcher: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Execute one complete run. Only a fetch failure is returned as `Err`;
    /// send failures are recorded in the report.
    pub async fn run(&mut self) -> Result<RunReport, TelemetryError> {
        self.state = DispatchState::Idle;
        self.transition(DispatchState::Fetching);

        let timestamp = RunTimestamp::now();
        let started = Instant::now();
        let facts = match self.source.fetch().await {
            Ok(facts) => facts,
            Err(e) => {
                error!("Dispatcher: profile fetch failed, no signals sent: {}", e);
                self.transition(DispatchState::Failed);
                return Err(e);
            }
        };
        let fetch_elapsed = started.elapsed();

        self.transition(DispatchState::Building);
        let fetched_at = timestamp.to_rfc3339();
        let ctx = RunContext {
            attributes: run_attributes(&self.repository, &fetched_at),
            repository: self.repository.clone(),
            timestamp_ms: timestamp.epoch_ms,
            fetched_at,
        };
        let built: Vec<(SignalKind, BuiltSignal)> = self
            .signals
            .iter()
            .map(|&kind| {
                let payload = match kind {
                    SignalKind::Metrics => BuiltSignal::Metrics(build_metric_batch(&facts, &ctx)),
                    SignalKind::Events => BuiltSignal::Event(build_event(&facts, &ctx)),
                    SignalKind::Logs => {
                        BuiltSignal::Log(build_log(&facts, &ctx, &self.log_settings))
                    }
                    SignalKind::Traces => {
                        BuiltSignal::Trace(build_trace_span(&ctx, fetch_elapsed))
                    }
                };
                (kind, payload)
            })
            .collect();

        let mut reports = Vec::with_capacity(built.len());
        for (kind, payload) in built {
            self.transition(DispatchState::Sending(kind));
            let result = match payload {
                BuiltSignal::Metrics(batch) => self.metric_sender.send_batch(batch).await,
                BuiltSignal::Event(event) => self.signal_sender.send_event(&event).await,
                BuiltSignal::Log(log) => self.signal_sender.send_log(&log).await,
                BuiltSignal::Trace(span) => self.signal_sender.send_trace(&span).await,
            };
            let report = SignalReport { kind, result };
            match &report.result {
                Ok(outcome) if outcome.is_success() => info!("{}", report.status_line()),
                Ok(_) => warn!("{}", report.status_line()),
                Err(_) => error!("{}", report.status_line()),
            }
            reports.push(report);
        }

        self.transition(DispatchState::Done);
        Ok(RunReport {
            repository: self.repository.clone(),
            timestamp_ms: ctx.timestamp_ms,
            facts,
            fetch_elapsed,
            signals: reports,
        })
    }
}
