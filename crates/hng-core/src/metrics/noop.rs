use hng_model::LastStatus;

use crate::metrics::backend::{AttemptOutcome, MetricsBackend};

/// No-op metrics backend that compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetrics;

impl MetricsBackend for NoOpMetrics {
    #[inline(always)]
    fn record_attempt_started(&self) {}

    #[inline(always)]
    fn record_attempt_completed(&self, _: AttemptOutcome, _: u64) {}

    #[inline(always)]
    fn record_retry_scheduled(&self, _: LastStatus, _: u64) {}

    #[inline(always)]
    fn record_queue_depth(&self, _: usize) {}
}
