use std::collections::VecDeque;

use tokio::time::Instant;

use hng_model::{LastStatus, RetryPlacement};

use crate::throttler::request::Pending;

/// Failed request waiting out its backoff.
pub(crate) struct Retry {
    pub request: Box<dyn Pending>,
    pub ready_at: Instant,
    /// Length of the fresh queue when the request failed; used by [`RetryPlacement::Splice`].
    pub position: usize,
}

/// What the drain loop should do next.
pub(crate) enum Next {
    Run(Box<dyn Pending>),
    Wait(Instant),
    Idle,
}

/// Mutable throttler state; always accessed under the throttler mutex.
#[derive(Default)]
pub(crate) struct ThrottlerState {
    pub fresh: VecDeque<Box<dyn Pending>>,
    pub retries: VecDeque<Retry>,
    pub draining: bool,
    pub closed: bool,
    pub call_count: u64,
    pub last_status: Option<LastStatus>,
}

impl ThrottlerState {
    /// Requests not yet settled and not in flight.
    pub fn depth(&self) -> usize {
        self.fresh.len() + self.retries.len()
    }

    /// Pick the next request according to `placement`.
    ///
    /// Returning [`Next::Idle`] clears `draining` under the same lock, so an `enqueue`
    /// racing with the end of the loop always starts a new one.
    pub fn next(&mut self, placement: RetryPlacement, now: Instant) -> Next {
        let next = match placement {
            RetryPlacement::Front => self.next_front(now),
            RetryPlacement::Blocking => self.next_blocking(now),
            RetryPlacement::Splice => self.next_splice(now),
        };
        if matches!(next, Next::Idle) {
            self.draining = false;
        }
        next
    }

    /// Take every queued request, leaving the state empty.
    pub fn take_all(&mut self) -> Vec<Box<dyn Pending>> {
        let mut all: Vec<_> = self.retries.drain(..).map(|r| r.request).collect();
        all.extend(self.fresh.drain(..));
        all
    }

    fn next_front(&mut self, now: Instant) -> Next {
        match self.earliest_retry() {
            Some((idx, ready_at)) if ready_at <= now => self.run_retry(idx),
            Some((_, ready_at)) => match self.fresh.pop_front() {
                Some(req) => Next::Run(req),
                None => Next::Wait(ready_at),
            },
            None => self.run_fresh(),
        }
    }

    fn next_blocking(&mut self, now: Instant) -> Next {
        match self.earliest_retry() {
            Some((idx, ready_at)) if ready_at <= now => self.run_retry(idx),
            Some((_, ready_at)) => Next::Wait(ready_at),
            None => self.run_fresh(),
        }
    }

    fn next_splice(&mut self, now: Instant) -> Next {
        while let Some((idx, ready_at)) = self.earliest_retry() {
            if ready_at > now {
                break;
            }
            if let Some(retry) = self.retries.remove(idx) {
                let at = retry.position.min(self.fresh.len());
                self.fresh.insert(at, retry.request);
            }
        }
        match self.fresh.pop_front() {
            Some(req) => Next::Run(req),
            None => match self.earliest_retry() {
                Some((_, ready_at)) => Next::Wait(ready_at),
                None => Next::Idle,
            },
        }
    }

    fn run_fresh(&mut self) -> Next {
        match self.fresh.pop_front() {
            Some(req) => Next::Run(req),
            None => Next::Idle,
        }
    }

    fn run_retry(&mut self, idx: usize) -> Next {
        match self.retries.remove(idx) {
            Some(retry) => Next::Run(retry.request),
            None => self.run_fresh(),
        }
    }

    /// Index and deadline of the retry that becomes ready first; ties go to the older entry.
    fn earliest_retry(&self) -> Option<(usize, Instant)> {
        self.retries
            .iter()
            .enumerate()
            .min_by_key(|(idx, r)| (r.ready_at, *idx))
            .map(|(idx, r)| (idx, r.ready_at))
    }
}
