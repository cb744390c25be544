use std::sync::Arc;

use prometheus::{
    Counter, CounterVec, Histogram, HistogramOpts, IntGauge, Opts, Registry, TextEncoder,
    proto::MetricFamily,
};

use hng_core::{AttemptOutcome, MetricsBackend};
use hng_model::LastStatus;

const NAMESPACE: &str = "hng";

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// - `outcome`: "success", "failure", "timeout", "canceled"
/// - `status`: "retrying", "rate-limited"
#[derive(Clone)]
pub struct PrometheusMetrics {
    attempts_started: Counter,
    attempts_completed: CounterVec,
    attempt_duration: Histogram,
    retries_scheduled: CounterVec,
    retry_backoff: Histogram,
    queue_depth: IntGauge,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let attempts_started = Counter::with_opts(
            Opts::new("attempts_started_total", "Remote attempts started").namespace(NAMESPACE),
        )?;
        registry.register(Box::new(attempts_started.clone()))?;

        let attempts_completed = CounterVec::new(
            Opts::new("attempts_completed_total", "Remote attempts completed").namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(attempts_completed.clone()))?;

        let attempt_duration = Histogram::with_opts(
            HistogramOpts::new("attempt_duration_seconds", "Remote attempt duration in seconds")
                .namespace(NAMESPACE)
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        )?;
        registry.register(Box::new(attempt_duration.clone()))?;

        let retries_scheduled = CounterVec::new(
            Opts::new("retries_scheduled_total", "Requests rescheduled after a failure")
                .namespace(NAMESPACE),
            &["status"],
        )?;
        registry.register(Box::new(retries_scheduled.clone()))?;

        let retry_backoff = Histogram::with_opts(
            HistogramOpts::new("retry_backoff_seconds", "Backoff applied before a retry")
                .namespace(NAMESPACE)
                .buckets(vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0]),
        )?;
        registry.register(Box::new(retry_backoff.clone()))?;

        let queue_depth = IntGauge::with_opts(
            Opts::new("queue_depth", "Requests waiting in the queue, retries included")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(queue_depth.clone()))?;

        Ok(Self {
            attempts_started,
            attempts_completed,
            attempt_duration,
            retries_scheduled,
            retry_backoff,
            queue_depth,
            registry,
        })
    }

    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render every family in the text exposition format, ready for a `/metrics` response.
    pub fn encode_text(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.gather())
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_attempt_started(&self) {
        self.attempts_started.inc();
    }

    fn record_attempt_completed(&self, outcome: AttemptOutcome, duration_ms: u64) {
        self.attempts_completed
            .with_label_values(&[outcome.as_label()])
            .inc();
        self.attempt_duration.observe(duration_ms as f64 / 1000.0);
    }

    fn record_retry_scheduled(&self, status: LastStatus, delay_ms: u64) {
        self.retries_scheduled
            .with_label_values(&[status.as_str()])
            .inc();
        self.retry_backoff.observe(delay_ms as f64 / 1000.0);
    }

    fn record_queue_depth(&self, depth: usize) {
        self.queue_depth
            .set(i64::try_from(depth).unwrap_or(i64::MAX));
    }
}
