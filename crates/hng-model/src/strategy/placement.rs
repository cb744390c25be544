use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Defines where a failed request re-enters the throttle queue.
///
/// The queue is single-lane: a failed attempt is rescheduled with exponential backoff,
/// and the placement decides what the lane does while that backoff runs and where the retry lands afterwards.
///
/// Strategies:
/// - `Front`: Fresh work keeps draining during the backoff; once ready, the retry goes ahead of every fresh request.
/// - `Blocking`: The retry holds the lane; nothing else is attempted until it has been re-attempted.
/// - `Splice`: Once ready, the retry is spliced back at the queue index recorded when it failed.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RetryPlacement {
    /// Retries jump ahead of fresh, not-yet-attempted requests once their backoff has elapsed,
    /// but stay behind other retries that became ready earlier.
    #[default]
    Front,
    /// Retries block the lane until they have been re-attempted.
    Blocking,
    /// Retries are re-inserted at the index the queue had when the attempt failed (clamped to the current length).
    Splice,
}

impl FromStr for RetryPlacement {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" | "head" | "" => Ok(RetryPlacement::Front),
            "blocking" | "block" => Ok(RetryPlacement::Blocking),
            "splice" | "position" => Ok(RetryPlacement::Splice),
            other => Err(ModelError::UnknownPlacement(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_front() {
        assert_eq!(RetryPlacement::default(), RetryPlacement::Front);
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("head".parse::<RetryPlacement>().unwrap(), RetryPlacement::Front);
        assert_eq!("BLOCK".parse::<RetryPlacement>().unwrap(), RetryPlacement::Blocking);
        assert_eq!("splice".parse::<RetryPlacement>().unwrap(), RetryPlacement::Splice);
        assert!("random".parse::<RetryPlacement>().is_err());
    }

    #[test]
    fn serde_uses_camel_case() {
        let json = serde_json::to_string(&RetryPlacement::Blocking).unwrap();
        assert_eq!(json, "\"blocking\"");
    }
}
