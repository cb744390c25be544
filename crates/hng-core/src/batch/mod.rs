//! Grouped batch processing on top of [`RequestThrottler`].
//!
//! Items are split into consecutive groups. Every item of a group is enqueued on the
//! throttler at once and the group is awaited as a whole; one item's failure never
//! cancels its siblings. Results keep the input order, with `None` in place of failed
//! items. Progress is reported after each group and the [`Progress::Done`] sentinel is
//! emitted exactly once at the end, including on panic or cancellation.
mod guard;

use std::{future::Future, sync::Arc, time::Duration};

use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use hng_model::Progress;

use crate::throttler::{RequestError, RequestThrottler};
use guard::DoneGuard;

/// Progress listener; receives percentages and finally [`Progress::Done`].
pub type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

/// Items per group when the caller has no preference.
pub const DEFAULT_GROUP_SIZE: usize = 5;

/// Pause between groups so a long batch yields to other work on the runtime.
const GROUP_PAUSE: Duration = Duration::from_millis(10);

/// Item that failed permanently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Position in the input.
    pub index: usize,
    pub reason: String,
}

/// Results in input order plus the failures behind the `None` slots.
#[derive(Debug)]
pub struct BatchReport<R> {
    pub results: Vec<Option<R>>,
    pub failures: Vec<BatchFailure>,
}

impl<R> BatchReport<R> {
    pub fn succeeded(&self) -> usize {
        self.results.len() - self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs batches of independent items through a shared throttler.
#[derive(Clone, Debug)]
pub struct BatchCoordinator {
    throttler: RequestThrottler,
}

impl BatchCoordinator {
    pub fn new(throttler: RequestThrottler) -> Self {
        Self { throttler }
    }

    pub fn throttler(&self) -> &RequestThrottler {
        &self.throttler
    }

    /// Process `items` and return one slot per item, `None` for those that failed.
    ///
    /// See [`run_batch_report`](Self::run_batch_report).
    pub async fn run_batch<I, R, P, Fut>(
        &self,
        items: Vec<I>,
        processor: P,
        group_size: usize,
        on_progress: Option<ProgressFn>,
    ) -> Vec<Option<R>>
    where
        I: Clone + Send + Sync + 'static,
        R: Send + 'static,
        P: Fn(I) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<R, RequestError>> + Send + 'static,
    {
        self.run_batch_report(items, processor, group_size, on_progress)
            .await
            .results
    }

    /// Process `items` in groups of `group_size` (zero is treated as one).
    ///
    /// `processor` may be invoked several times for the same item when the throttler retries it.
    /// An empty input returns at once and still signals [`Progress::Done`].
    #[instrument(level = "debug", skip_all, fields(items = items.len(), group_size = group_size))]
    pub async fn run_batch_report<I, R, P, Fut>(
        &self,
        items: Vec<I>,
        processor: P,
        group_size: usize,
        on_progress: Option<ProgressFn>,
    ) -> BatchReport<R>
    where
        I: Clone + Send + Sync + 'static,
        R: Send + 'static,
        P: Fn(I) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<R, RequestError>> + Send + 'static,
    {
        let guard = DoneGuard::new(on_progress);
        let total = items.len();
        let mut report = BatchReport {
            results: Vec::with_capacity(total),
            failures: Vec::new(),
        };
        if total == 0 {
            debug!("empty batch");
            return report;
        }

        let group_size = group_size.max(1);
        let mut items = items.into_iter();
        let mut processed = 0;

        for group in 0..total.div_ceil(group_size) {
            if group > 0 {
                tokio::time::sleep(GROUP_PAUSE).await;
            }

            let handles: Vec<_> = items
                .by_ref()
                .take(group_size)
                .map(|item| {
                    let processor = processor.clone();
                    self.throttler.enqueue(move || processor(item.clone()))
                })
                .collect();
            processed += handles.len();

            for settled in join_all(handles).await {
                let index = report.results.len();
                match settled {
                    Ok(value) => report.results.push(Some(value)),
                    Err(e) => {
                        debug!(index, error = %e, "batch item failed");
                        report.failures.push(BatchFailure {
                            index,
                            reason: e.to_string(),
                        });
                        report.results.push(None);
                    }
                }
            }

            let progress = Progress::from_counts(processed, total);
            debug!(group, %progress, "batch group settled");
            guard.report(progress);
        }

        if !report.failures.is_empty() {
            warn!(
                failed = report.failures.len(),
                total, "batch completed with errors"
            );
        }
        report
    }
}
