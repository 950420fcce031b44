//! Metric names and help text.
//!
//! The `metrics` facade is recorder-agnostic; the embedding process installs
//! whatever exporter it runs. Call [`describe_metrics`] once at startup if
//! the installed recorder surfaces help text.

use ::metrics::{describe_counter, describe_histogram, Unit};

/// Successful queries, labeled by endpoint url.
pub const SUBGRAPH_OK_TOTAL: &str = "subgraph_ok_total";
/// Failed attempts, labeled by endpoint url and classified kind.
pub const SUBGRAPH_ERRORS_TOTAL: &str = "subgraph_errors_total";
/// Attempt duration in seconds, labeled by endpoint url.
pub const SUBGRAPH_QUERY_DURATION_SECONDS: &str = "subgraph_query_duration_seconds";

/// Registers help text for every metric this crate emits.
pub fn describe_metrics() {
    describe_counter!(SUBGRAPH_OK_TOTAL, "Subgraph request counter");
    describe_counter!(SUBGRAPH_ERRORS_TOTAL, "Subgraph error counter");
    describe_histogram!(
        SUBGRAPH_QUERY_DURATION_SECONDS,
        Unit::Seconds,
        "Request duration in seconds."
    );
}
