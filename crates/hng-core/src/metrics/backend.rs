use std::sync::Arc;

use hng_model::LastStatus;

/// Outcome of a single attempt for metrics classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Operation returned a value.
    Success,
    /// Operation returned an error.
    Failure,
    /// Attempt exceeded the per-attempt timeout.
    Timeout,
    /// Throttler shut down while the attempt was in flight.
    Canceled,
}

impl AttemptOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            AttemptOutcome::Success => "success",
            AttemptOutcome::Failure => "failure",
            AttemptOutcome::Timeout => "timeout",
            AttemptOutcome::Canceled => "canceled",
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations are injected via [`crate::ThrottlerContext::with_metrics`] and called from the drain loop only,
/// so calls never overlap for one throttler.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record that an attempt is about to hit the remote endpoint.
    fn record_attempt_started(&self);
    /// Record attempt completion with outcome and duration.
    ///
    /// # Arguments
    /// - `outcome`: How the attempt terminated
    /// - `duration_ms`: Wall-clock time of the attempt in milliseconds
    fn record_attempt_completed(&self, outcome: AttemptOutcome, duration_ms: u64);
    /// Record a rescheduled request.
    ///
    /// # Arguments
    /// - `status`: `Retrying` or `RateLimited`
    /// - `delay_ms`: Backoff applied before the retry becomes eligible
    fn record_retry_scheduled(&self, status: LastStatus, delay_ms: u64);
    /// Record the number of requests waiting in the queue (fresh + retries).
    fn record_queue_depth(&self, depth: usize);
}

/// Shared handle to metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
