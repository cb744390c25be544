pub mod keys;

/// Delay value in milliseconds.
///
/// Used for throttle spacing and retry backoff.
pub type DelayMs = u64;

/// Timeout value in milliseconds.
///
/// Applied to every single attempt of a queued request.
pub type TimeoutMs = u64;
