//! Dashboard metrics.
//!
//! # Metrics
//!
//! - `mams_dashboard_stale_responses_total` - Counter of summary responses
//!   discarded because a newer filter superseded them
//! - `mams_dashboard_cache_hits_total` - Reference data served from cache
//! - `mams_dashboard_cache_misses_total` - Reference data fetched from the service

use metrics::counter;

/// Metric name for discarded summary responses.
pub const STALE_RESPONSES_TOTAL: &str = "mams_dashboard_stale_responses_total";

/// Metric name for reference cache hits.
pub const CACHE_HITS_TOTAL: &str = "mams_dashboard_cache_hits_total";

/// Metric name for reference cache misses.
pub const CACHE_MISSES_TOTAL: &str = "mams_dashboard_cache_misses_total";

/// Record a summary response dropped as stale.
pub fn record_stale_response() {
    counter!(STALE_RESPONSES_TOTAL).increment(1);
}

/// Record a reference cache lookup.
pub fn record_cache_lookup(kind: &'static str, hit: bool) {
    if hit {
        counter!(CACHE_HITS_TOTAL, "kind" => kind).increment(1);
    } else {
        counter!(CACHE_MISSES_TOTAL, "kind" => kind).increment(1);
    }
}

/// Register metric descriptions.
pub fn describe_metrics() {
    use metrics::{describe_counter, Unit};

    describe_counter!(
        STALE_RESPONSES_TOTAL,
        Unit::Count,
        "Dashboard summary responses discarded because a newer filter was issued"
    );

    describe_counter!(
        CACHE_HITS_TOTAL,
        Unit::Count,
        "Reference data lookups served from the dashboard cache"
    );

    describe_counter!(
        CACHE_MISSES_TOTAL,
        Unit::Count,
        "Reference data lookups that fetched from the inventory service"
    );
}
