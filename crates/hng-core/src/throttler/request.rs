use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::throttler::{RequestError, RequestId};

/// Type-erased queued request as seen by the drain loop.
#[async_trait]
pub(crate) trait Pending: Send {
    fn id(&self) -> RequestId;

    /// Number of retries already scheduled for this request.
    fn retry_count(&self) -> u32;

    /// Increment the retry counter and return the new value.
    fn bump_retry(&mut self) -> u32;

    /// The caller dropped its handle; nobody is waiting for the result.
    fn is_abandoned(&self) -> bool;

    /// Run the operation once, keeping its output for [`Pending::resolve`].
    async fn attempt(&mut self) -> Result<(), RequestError>;

    /// Settle the caller with the output of the last successful attempt.
    fn resolve(self: Box<Self>);

    /// Settle the caller with an error.
    fn reject(self: Box<Self>, err: RequestError);
}

type Reply<T> = oneshot::Sender<Result<T, RequestError>>;

/// Re-invocable operation plus the channel that settles its caller.
pub(crate) struct QueuedRequest<T, F> {
    id: RequestId,
    retry_count: u32,
    operation: F,
    output: Option<T>,
    reply: Reply<T>,
}

impl<T, F> QueuedRequest<T, F> {
    pub(crate) fn new<Fut>(operation: F) -> (Self, RequestHandle<T>)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, RequestError>>,
    {
        let (tx, rx) = oneshot::channel();
        let req = Self {
            id: RequestId::next(),
            retry_count: 0,
            operation,
            output: None,
            reply: tx,
        };
        (req, RequestHandle { rx })
    }
}

#[async_trait]
impl<T, F, Fut> Pending for QueuedRequest<T, F>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, RequestError>> + Send + 'static,
{
    fn id(&self) -> RequestId {
        self.id
    }

    fn retry_count(&self) -> u32 {
        self.retry_count
    }

    fn bump_retry(&mut self) -> u32 {
        self.retry_count += 1;
        self.retry_count
    }

    fn is_abandoned(&self) -> bool {
        self.reply.is_closed()
    }

    async fn attempt(&mut self) -> Result<(), RequestError> {
        let call = (self.operation)();
        self.output = Some(call.await?);
        Ok(())
    }

    fn resolve(self: Box<Self>) {
        let settled = match self.output {
            Some(value) => Ok(value),
            None => Err(RequestError::Internal(
                "request resolved before a successful attempt".into(),
            )),
        };
        let _ = self.reply.send(settled);
    }

    fn reject(self: Box<Self>, err: RequestError) {
        let _ = self.reply.send(Err(err));
    }
}

/// Future returned by [`crate::RequestThrottler::enqueue`].
///
/// Resolves once the drain loop settles the request. If the throttler goes away without
/// settling it, resolves to [`RequestError::Canceled`].
#[must_use = "a request handle does nothing unless awaited"]
#[derive(Debug)]
pub struct RequestHandle<T> {
    rx: oneshot::Receiver<Result<T, RequestError>>,
}

impl<T> Future for RequestHandle<T> {
    type Output = Result<T, RequestError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|settled| settled.unwrap_or(Err(RequestError::Canceled)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn attempt_then_resolve_delivers_output() {
        let (req, handle) = QueuedRequest::new(|| async { Ok::<_, RequestError>(7) });
        let mut req: Box<dyn Pending> = Box::new(req);
        req.attempt().await.unwrap();
        req.resolve();
        assert_eq!(handle.await, Ok(7));
    }

    #[tokio::test]
    async fn dropped_request_cancels_handle() {
        let (req, handle) = QueuedRequest::new(|| async { Ok::<_, RequestError>(()) });
        drop(req);
        assert_eq!(handle.await, Err(RequestError::Canceled));
    }

    #[tokio::test]
    async fn abandoned_when_handle_dropped() {
        let (req, handle) = QueuedRequest::new(|| async { Ok::<_, RequestError>(()) });
        assert!(!req.is_abandoned());
        drop(handle);
        assert!(req.is_abandoned());
    }

    #[tokio::test]
    async fn retry_counter_bumps() {
        let (mut req, _handle) = QueuedRequest::new(|| async { Ok::<_, RequestError>(()) });
        assert_eq!(req.retry_count(), 0);
        assert_eq!(req.bump_retry(), 1);
        assert_eq!(req.bump_retry(), 2);
    }
}
