use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_RUN_MS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Run timestamp, strictly increasing within the process.
///
/// Two runs inside the same millisecond (or a wall clock stepping backwards)
/// are bumped to the previous value + 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunTimestamp {
    pub epoch_ms: i64,
}

impl RunTimestamp {
    pub fn now() -> Self {
        Self::after(Utc::now().timestamp_millis())
    }

    fn after(wall_ms: i64) -> Self {
        let mut previous = LAST_RUN_MS.load(Ordering::Relaxed);
        loop {
            let next = wall_ms.max(previous.saturating_add(1));
            match LAST_RUN_MS.compare_exchange_weak(
                previous,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self { epoch_ms: next },
                Err(actual) => previous = actual,
            }
        }
    }

    /// ISO-8601 instant with millisecond precision
    pub fn to_rfc3339(&self) -> String {
        let instant: DateTime<Utc> = Utc
            .timestamp_millis_opt(self.epoch_ms)
            .single()
            .unwrap_or_else(Utc::now);
        instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consecutive_timestamps_strictly_increase() {
        let first = RunTimestamp::now();
        let second = RunTimestamp::now();
        let third = RunTimestamp::now();

        assert!(second.epoch_ms > first.epoch_ms);
        assert!(third.epoch_ms > second.epoch_ms);
    }

    #[test]
    fn test_clock_going_backwards_still_increases() {
        let recent = RunTimestamp::now();
        let stale = RunTimestamp::after(recent.epoch_ms - 10_000);

        assert!(stale.epoch_ms > recent.epoch_ms);
    }

    #[test]
    fn test_rfc3339_rendering() {
        let ts = RunTimestamp {
            epoch_ms: 1_704_067_200_123,
        };
        assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00.123Z");
    }
}
