//! Client metrics for observability.
//!
//! # Metrics
//!
//! - `mams_client_requests_total` - Counter of requests by endpoint, status
//! - `mams_client_request_duration_seconds` - Histogram of request latencies
//! - `mams_client_retries_total` - Counter of retry attempts
//!
//! Metrics are recorded whenever a `metrics`-compatible recorder is
//! installed; the library installs none.

use std::time::Instant;

use metrics::{counter, histogram};

/// Metric name for total requests.
pub const REQUESTS_TOTAL: &str = "mams_client_requests_total";

/// Metric name for request duration histogram.
pub const REQUEST_DURATION_SECONDS: &str = "mams_client_request_duration_seconds";

/// Metric name for retry counter.
pub const RETRIES_TOTAL: &str = "mams_client_retries_total";

/// Service endpoints, used as metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ObtainToken,
    RefreshToken,
    CurrentUser,
    Bases,
    EquipmentTypes,
    DashboardSummary,
    Purchases,
    Transfers,
    Assignments,
    Expenditures,
}

impl Endpoint {
    /// Label value for metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObtainToken => "token",
            Self::RefreshToken => "token_refresh",
            Self::CurrentUser => "users_me",
            Self::Bases => "bases",
            Self::EquipmentTypes => "equipment_types",
            Self::DashboardSummary => "dashboard_summary",
            Self::Purchases => "purchases",
            Self::Transfers => "transfers",
            Self::Assignments => "assignments",
            Self::Expenditures => "expenditures",
        }
    }

    /// Path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::ObtainToken => "/token/",
            Self::RefreshToken => "/token/refresh/",
            Self::CurrentUser => "/users/me/",
            Self::Bases => "/users/bases/",
            Self::EquipmentTypes => "/assets/equipment-types/",
            Self::DashboardSummary => "/assets/dashboard/summary/",
            Self::Purchases => "/assets/purchases/",
            Self::Transfers => "/logistics/transfers/",
            Self::Assignments => "/logistics/assignments/",
            Self::Expenditures => "/logistics/expenditures/",
        }
    }
}

/// Request status for metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Timeout,
    Cancelled,
}

impl Status {
    /// Get the status as a string for metrics labels.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Record a request completion.
pub fn record_request(endpoint: Endpoint, status: Status, duration_seconds: f64) {
    counter!(
        REQUESTS_TOTAL,
        "endpoint" => endpoint.as_str(),
        "status" => status.as_str()
    )
    .increment(1);

    histogram!(
        REQUEST_DURATION_SECONDS,
        "endpoint" => endpoint.as_str()
    )
    .record(duration_seconds);
}

/// Record a retry attempt (1-indexed).
pub fn record_retry(endpoint: Endpoint, attempt: u32) {
    counter!(
        RETRIES_TOTAL,
        "endpoint" => endpoint.as_str(),
        "attempt" => attempt.to_string()
    )
    .increment(1);
}

/// Timer guard for request duration.
///
/// Records as cancelled when dropped without an explicit outcome, which
/// happens when the calling future is dropped mid-request.
#[must_use]
pub struct RequestTimer {
    endpoint: Endpoint,
    start: Instant,
    recorded: bool,
}

impl RequestTimer {
    /// Start a new request timer.
    pub fn start(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Record the outcome and return the duration.
    pub fn finish(mut self, status: Status) -> std::time::Duration {
        let duration = self.start.elapsed();
        record_request(self.endpoint, status, duration.as_secs_f64());
        self.recorded = true;
        duration
    }

    /// Record success and return the duration.
    pub fn success(self) -> std::time::Duration {
        self.finish(Status::Success)
    }

    /// Record an error and return the duration.
    pub fn error(self) -> std::time::Duration {
        self.finish(Status::Error)
    }

    /// Record a timeout and return the duration.
    pub fn timeout(self) -> std::time::Duration {
        self.finish(Status::Timeout)
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        if !self.recorded {
            let duration = self.start.elapsed();
            record_request(self.endpoint, Status::Cancelled, duration.as_secs_f64());
        }
    }
}

/// Describe all metrics for registration with a recorder.
pub fn describe_metrics() {
    use metrics::{describe_counter, describe_histogram, Unit};

    describe_counter!(
        REQUESTS_TOTAL,
        Unit::Count,
        "Total number of HTTP requests made by the MAMS client"
    );

    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        Unit::Seconds,
        "Duration of HTTP requests in seconds"
    );

    describe_counter!(
        RETRIES_TOTAL,
        Unit::Count,
        "Total number of retry attempts by the MAMS client"
    );
}
