//! Metrics collection abstraction for the request throttler.
//!
//! This module provides a backend interface for collecting runtime metrics from queued remote calls.
//! Metrics backends (prometheus, statsd, etc) implement [`MetricsBackend`] and are injected into [`crate::RequestThrottler`].
mod backend;
pub use backend::{AttemptOutcome, MetricsBackend, MetricsHandle};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
