//! Single-lane request queue with throttling and retries.
//!
//! [`RequestThrottler`] admits re-invocable async operations and runs them strictly one at a
//! time, leaving at least the throttle delay between the end of one attempt and the start of
//! the next. Transient failures are rescheduled with exponential backoff; where the retry
//! re-enters the queue is decided by [`hng_model::RetryPlacement`]. Every attempt is bounded by the
//! strategy timeout.
//!
//! The lifetime call counter and the last status are mirrored into the context store so they
//! survive restarts (see [`RequestThrottler::load`]).
mod context;
pub use context::ThrottlerContext;

mod drain;

mod error;
pub use error::RequestError;

mod id;
pub use id::RequestId;

mod request;
pub use request::RequestHandle;

mod state;

use std::{
    fmt,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde_json::Value;
use tokio::sync::{Mutex as AsyncMutex, Notify};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use hng_model::{LastStatus, ThrottleStrategy, keys};

use crate::{
    error::CoreError,
    store::{StoreMap, set_one},
};
use request::{Pending, QueuedRequest};
use state::ThrottlerState;

/// State shared between throttler handles and the drain task.
pub(crate) struct Shared {
    strategy: ThrottleStrategy,
    ctx: ThrottlerContext,
    state: Mutex<ThrottlerState>,
    shutdown: CancellationToken,
    wake: Notify,
    /// Held across every counter write so writes land in the order memory changed.
    persist_lock: AsyncMutex<()>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ThrottlerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write `status` (and, with `with_count`, the call counter) to the store; failures are
    /// logged and otherwise ignored.
    ///
    /// The counter is read after the write lock is taken, never from an earlier snapshot.
    async fn persist(&self, status: LastStatus, with_count: bool) {
        let _write = self.persist_lock.lock().await;
        let mut entries = StoreMap::new();
        entries.insert(keys::LAST_API_STATUS.into(), Value::from(status.as_str()));
        if with_count {
            entries.insert(keys::API_CALL_COUNT.into(), Value::from(self.lock().call_count));
        }
        if let Err(e) = self.ctx.store().set(entries).await {
            warn!(error = %e, "failed to persist throttler counters");
        }
    }

    /// Reject everything still queued with [`RequestError::Canceled`].
    fn cancel_queued(&self) -> usize {
        let queued = self.lock().take_all();
        let n = queued.len();
        for req in queued {
            req.reject(RequestError::Canceled);
        }
        n
    }
}

/// Handle to a request queue. Cloning is cheap; all clones share one queue.
#[derive(Clone)]
pub struct RequestThrottler {
    shared: Arc<Shared>,
}

impl RequestThrottler {
    /// Create a throttler with zeroed counters.
    pub fn new(strategy: ThrottleStrategy, ctx: ThrottlerContext) -> Result<Self, CoreError> {
        strategy.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                strategy,
                ctx,
                state: Mutex::new(ThrottlerState::default()),
                shutdown: CancellationToken::new(),
                wake: Notify::new(),
                persist_lock: AsyncMutex::new(()),
            }),
        })
    }

    /// Create a throttler and restore the call counter and last status from the context store.
    ///
    /// Unreadable or missing values start from zero / no status.
    pub async fn load(strategy: ThrottleStrategy, ctx: ThrottlerContext) -> Result<Self, CoreError> {
        let throttler = Self::new(strategy, ctx)?;
        let store = throttler.shared.ctx.store();

        match store.get(&[keys::API_CALL_COUNT, keys::LAST_API_STATUS]).await {
            Ok(saved) => {
                let count = saved
                    .get(keys::API_CALL_COUNT)
                    .and_then(Value::as_u64)
                    .unwrap_or(0);
                let status = saved
                    .get(keys::LAST_API_STATUS)
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse::<LastStatus>().ok());

                let mut st = throttler.shared.lock();
                st.call_count = count;
                st.last_status = status;
                debug!(call_count = count, last_status = ?status, "throttler counters restored");
            }
            Err(e) => warn!(error = %e, "failed to load throttler counters, starting from zero"),
        }
        Ok(throttler)
    }

    pub fn strategy(&self) -> &ThrottleStrategy {
        &self.shared.strategy
    }

    /// Queue `operation` and return a handle that settles once the request does.
    ///
    /// `operation` is invoked once per attempt, so it must be safe to call again after a failure.
    /// The drain loop is spawned on the current tokio runtime if it is not already running.
    /// After [`shutdown`](Self::shutdown) the handle settles at once with [`RequestError::Canceled`].
    ///
    /// # Examples
    /// ```
    /// use hng_core::{RequestError, RequestThrottler, ThrottlerContext};
    /// use hng_model::ThrottleStrategy;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let q = RequestThrottler::new(ThrottleStrategy::default(), ThrottlerContext::default()).unwrap();
    /// let out = q.enqueue(|| async { Ok::<_, RequestError>(7) }).await;
    /// assert_eq!(out, Ok(7));
    /// assert_eq!(q.call_count(), 1);
    /// # }
    /// ```
    pub fn enqueue<T, F, Fut>(&self, operation: F) -> RequestHandle<T>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
    {
        let (req, handle) = QueuedRequest::new(operation);
        let id = req.id();

        let (depth, start) = {
            let mut st = self.shared.lock();
            if st.closed {
                drop(st);
                debug!(request = %id, "throttler is shut down, request rejected");
                Box::new(req).reject(RequestError::Canceled);
                return handle;
            }
            st.fresh.push_back(Box::new(req));
            let start = !st.draining;
            st.draining = true;
            (st.depth(), start)
        };

        trace!(request = %id, depth, "request enqueued");
        self.shared.ctx.metrics().record_queue_depth(depth);

        if start {
            tokio::spawn(drain::run(Arc::clone(&self.shared)));
        } else {
            self.shared.wake.notify_one();
        }
        handle
    }

    /// Successful requests since the counter was last reset, including restored history.
    pub fn call_count(&self) -> u64 {
        self.shared.lock().call_count
    }

    pub fn last_status(&self) -> Option<LastStatus> {
        self.shared.lock().last_status
    }

    /// Requests waiting to run, retries included; the in-flight one is not counted.
    pub fn queue_depth(&self) -> usize {
        self.shared.lock().depth()
    }

    /// Whether a drain loop is currently active.
    pub fn is_draining(&self) -> bool {
        self.shared.lock().draining
    }

    /// Zero the call counter in memory and in the store. The last status is kept.
    ///
    /// Serialized with the drain loop's counter writes, so a success settling at the same
    /// time cannot leave a stale count in the store.
    pub async fn reset_call_count(&self) -> Result<(), CoreError> {
        let _write = self.shared.persist_lock.lock().await;
        self.shared.lock().call_count = 0;
        set_one(self.shared.ctx.store().as_ref(), keys::API_CALL_COUNT, 0).await?;
        info!("api call counter reset");
        Ok(())
    }

    /// Stop the drain loop and reject every queued and in-flight request.
    ///
    /// Later `enqueue` calls are rejected immediately.
    pub fn shutdown(&self) {
        self.shared.lock().closed = true;
        self.shared.shutdown.cancel();
        let rejected = self.shared.cancel_queued();
        info!(rejected, "request throttler shut down");
    }

    pub fn is_shutdown(&self) -> bool {
        self.shared.shutdown.is_cancelled()
    }
}

impl fmt::Debug for RequestThrottler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = self.shared.lock();
        f.debug_struct("RequestThrottler")
            .field("strategy", &self.shared.strategy)
            .field("depth", &st.depth())
            .field("draining", &st.draining)
            .field("call_count", &st.call_count)
            .field("last_status", &st.last_status)
            .finish()
    }
}
