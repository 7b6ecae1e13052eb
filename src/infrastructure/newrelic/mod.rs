//! New Relic ingest sinks.
//!
//! Every payload leaves through an [`HttpPoster`](crate::domain::ports::HttpPoster);
//! nothing in here talks to a concrete HTTP client.

pub mod endpoints;
pub mod metric_batch_sender;
pub mod sinks;

pub use endpoints::{Endpoints, Region};
pub use metric_batch_sender::MetricBatchSender;
pub use sinks::SignalSender;

use std::collections::HashMap;

pub const API_KEY_HEADER: &str = "Api-Key";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Headers every ingest endpoint requires
pub fn ingest_headers(api_key: &str) -> HashMap<String, String> {
    HashMap::from([
        (API_KEY_HEADER.to_string(), api_key.to_string()),
        ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
    ])
}
