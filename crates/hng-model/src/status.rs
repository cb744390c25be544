use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Outcome of the most recently settled (or attempted) remote request.
///
/// The throttler keeps exactly one of these and persists it next to the call counter,
/// so a status indicator survives process restarts.
///
/// - `Success`: the last request completed.
/// - `Retrying`: the last attempt failed and was rescheduled with backoff.
/// - `RateLimited`: like `Retrying`, but the remote answered with HTTP 429.
/// - `Failed`: the last request exhausted its retries.
/// - `Error`: the last request failed with a non-retryable error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LastStatus {
    Success,
    Retrying,
    RateLimited,
    Failed,
    Error,
}

impl LastStatus {
    /// Returns the canonical wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            LastStatus::Success => "success",
            LastStatus::Retrying => "retrying",
            LastStatus::RateLimited => "rate-limited",
            LastStatus::Failed => "failed",
            LastStatus::Error => "error",
        }
    }

    /// `true` for statuses after which the request is still alive in the queue.
    pub const fn is_pending(&self) -> bool {
        matches!(self, LastStatus::Retrying | LastStatus::RateLimited)
    }
}

impl fmt::Display for LastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LastStatus {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(LastStatus::Success),
            "retrying" => Ok(LastStatus::Retrying),
            "rate-limited" | "ratelimited" | "rate_limited" => Ok(LastStatus::RateLimited),
            "failed" => Ok(LastStatus::Failed),
            "error" => Ok(LastStatus::Error),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}
