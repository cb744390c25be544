//! Prometheus metrics backend for the request throttler.
//!
//! [`PrometheusMetrics`] implements [`hng_core::MetricsBackend`] over its own registry.
//! The crate does not serve HTTP: mount [`PrometheusMetrics::encode_text`] on whatever
//! router the application already runs.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use hng_core::ThrottlerContext;
//! use hng_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let ctx = ThrottlerContext::default().with_metrics(Arc::new(metrics.clone()));
//! # let _ = ctx;
//! let body = metrics.encode_text()?;
//! # let _ = body;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `hng_attempts_started_total` - Counter
//! - `hng_attempts_completed_total{outcome}` - Counter
//! - `hng_attempt_duration_seconds` - Histogram
//! - `hng_retries_scheduled_total{status}` - Counter
//! - `hng_retry_backoff_seconds` - Histogram
//! - `hng_queue_depth` - Gauge

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
