use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures_util::FutureExt;
use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, error, trace, warn};

use hng_model::LastStatus;

use crate::{
    metrics::AttemptOutcome,
    throttler::{
        RequestError, Shared,
        request::Pending,
        state::{Next, Retry},
    },
};

/// Drain loop: runs queued requests one at a time until the queue is empty or the throttler shuts down.
pub(crate) async fn run(shared: Arc<Shared>) {
    debug!("drain loop started");
    loop {
        if shared.shutdown.is_cancelled() {
            break;
        }
        let next = shared
            .lock()
            .next(shared.strategy.placement, Instant::now());

        match next {
            Next::Idle => {
                debug!("queue empty, drain loop stopped");
                return;
            }
            Next::Wait(until) => {
                trace!(wait_ms = millis(until.saturating_duration_since(Instant::now())), "waiting for retry backoff");
                tokio::select! {
                    _ = shared.shutdown.cancelled() => break,
                    _ = sleep_until(until) => {}
                    _ = shared.wake.notified() => {}
                }
            }
            Next::Run(req) => {
                if req.is_abandoned() {
                    debug!(request = %req.id(), "caller went away, request dropped");
                    continue;
                }
                settle(&shared, req).await;
                tokio::select! {
                    _ = shared.shutdown.cancelled() => break,
                    _ = sleep(shared.strategy.throttle_delay()) => {}
                }
            }
        }
    }
    shared.cancel_queued();
    debug!("drain loop canceled");
}

/// Run one attempt and apply its outcome: resolve, reschedule or reject.
async fn settle(shared: &Shared, mut req: Box<dyn Pending>) {
    let id = req.id();
    let attempt = req.retry_count() + 1;
    let metrics = shared.ctx.metrics();

    metrics.record_attempt_started();
    trace!(request = %id, attempt, "attempt started");
    let started = Instant::now();

    let result = tokio::select! {
        biased;
        _ = shared.shutdown.cancelled() => None,
        r = guarded(req.as_mut(), shared.strategy.timeout()) => Some(r),
    };
    let elapsed_ms = millis(started.elapsed());

    let Some(result) = result else {
        metrics.record_attempt_completed(AttemptOutcome::Canceled, elapsed_ms);
        debug!(request = %id, attempt, "attempt canceled by shutdown");
        req.reject(RequestError::Canceled);
        return;
    };

    match result {
        Ok(()) => {
            metrics.record_attempt_completed(AttemptOutcome::Success, elapsed_ms);
            let count = {
                let mut st = shared.lock();
                st.call_count += 1;
                st.last_status = Some(LastStatus::Success);
                st.call_count
            };
            shared.persist(LastStatus::Success, true).await;

            debug!(request = %id, attempt, elapsed_ms, call_count = count, "request succeeded");
            req.resolve();
        }
        Err(err) => {
            let outcome = match &err {
                RequestError::Timeout { .. } => AttemptOutcome::Timeout,
                _ => AttemptOutcome::Failure,
            };
            metrics.record_attempt_completed(outcome, elapsed_ms);

            if err.is_retryable() && req.retry_count() < shared.strategy.max_retries {
                let retry = req.bump_retry();
                let delay = shared.strategy.backoff_for(retry);
                let status = if err.is_rate_limited() {
                    LastStatus::RateLimited
                } else {
                    LastStatus::Retrying
                };
                warn!(
                    request = %id,
                    attempt,
                    retry,
                    max_retries = shared.strategy.max_retries,
                    delay_ms = millis(delay),
                    error = %err,
                    "attempt failed, retry scheduled"
                );
                metrics.record_retry_scheduled(status, millis(delay));

                let now = Instant::now();
                let ready_at = now
                    .checked_add(delay)
                    .unwrap_or_else(|| now + Duration::from_secs(86_400 * 365 * 30));
                let depth = {
                    let mut st = shared.lock();
                    st.last_status = Some(status);
                    let position = st.fresh.len();
                    st.retries.push_back(Retry {
                        request: req,
                        ready_at,
                        position,
                    });
                    st.depth()
                };
                metrics.record_queue_depth(depth);
                shared.persist(status, false).await;
            } else {
                let status = if err.is_retryable() {
                    LastStatus::Failed
                } else {
                    LastStatus::Error
                };
                error!(request = %id, attempt, status = %status, error = %err, "request failed");
                shared.lock().last_status = Some(status);
                shared.persist(status, false).await;
                req.reject(err);
            }
        }
    }
}

/// One attempt with the per-attempt timeout applied and panics converted to errors.
async fn guarded(req: &mut dyn Pending, limit: Option<Duration>) -> Result<(), RequestError> {
    let call = AssertUnwindSafe(req.attempt()).catch_unwind();
    let caught = match limit {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(caught) => caught,
            Err(_) => {
                return Err(RequestError::Timeout {
                    timeout_ms: millis(limit),
                });
            }
        },
        None => call.await,
    };
    caught.unwrap_or_else(|panic| Err(RequestError::Internal(panic_message(panic.as_ref()))))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("operation panicked: {msg}")
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("operation panicked: {msg}")
    } else {
        "operation panicked".to_string()
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
