use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Global monotonically increasing sequence for request identifiers.
///
/// Local to the current process; shared by every throttler instance.
static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

/// Identifier of a queued request, used only to correlate log lines.
///
/// Displays as `req-{seq:x}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Allocate the next identifier.
    pub(crate) fn next() -> Self {
        RequestId(REQUEST_SEQ.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{:x}", self.0)
    }
}
