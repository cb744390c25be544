use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Batch progress as reported to listeners.
///
/// On the wire this is a single integer: `0..=100` while the batch is running and `-1` once it has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// Percentage of processed items, clamped to `0..=100`.
    Percent(u8),
    /// Terminal sentinel, emitted exactly once per batch.
    Done,
}

impl Progress {
    /// Wire value of the terminal sentinel.
    pub const DONE: i32 = -1;

    /// Build a percentage from processed / total counts, rounding half away from zero.
    ///
    /// A zero `total` yields `Percent(100)`.
    ///
    /// # Examples
    /// ```
    /// use hng_model::Progress;
    ///
    /// assert_eq!(Progress::from_counts(5, 12), Progress::Percent(42));
    /// assert_eq!(Progress::from_counts(0, 0).as_i32(), 100);
    /// assert_eq!(Progress::Done.as_i32(), -1);
    /// ```
    pub fn from_counts(processed: usize, total: usize) -> Self {
        if total == 0 {
            return Progress::Percent(100);
        }
        let processed = processed.min(total) as u64;
        let total = total as u64;
        let pct = (processed * 200 + total) / (total * 2);
        Progress::Percent(pct as u8)
    }

    /// Returns the integer representation (`-1` for [`Progress::Done`]).
    pub const fn as_i32(&self) -> i32 {
        match self {
            Progress::Percent(p) => *p as i32,
            Progress::Done => Self::DONE,
        }
    }

    pub const fn is_done(&self) -> bool {
        matches!(self, Progress::Done)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Percent(p) => write!(f, "{p}%"),
            Progress::Done => f.write_str("done"),
        }
    }
}

impl Serialize for Progress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.as_i32())
    }
}

impl<'de> Deserialize<'de> for Progress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = i32::deserialize(deserializer)?;
        match v {
            Self::DONE => Ok(Progress::Done),
            0..=100 => Ok(Progress::Percent(v as u8)),
            other => Err(serde::de::Error::custom(format!(
                "progress out of range: {other}"
            ))),
        }
    }
}
