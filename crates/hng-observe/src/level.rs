use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::LoggerError;

const DEFAULT_FILTER: &str = "info";
const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Validated `EnvFilter` directive string, e.g. `"hng_core=debug,info"`.
///
/// A directive without `=` must be a bare level. `EnvFilter` would read any other bare
/// word as a target, so a typo like `"dbug"` would mute everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoggerLevel(String);

impl LoggerLevel {
    /// # Examples
    /// ```
    /// use hng_observe::LoggerLevel;
    ///
    /// let lvl = LoggerLevel::new("hng_core=debug,info").unwrap();
    /// assert_eq!(lvl.as_str(), "hng_core=debug,info");
    /// assert!(LoggerLevel::new("dbug").is_err());
    /// ```
    pub fn new(s: impl Into<String>) -> Result<Self, LoggerError> {
        Self::try_from(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directives are checked on construction; the fallback only covers a filter that
    /// no longer parses.
    pub fn to_env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.0).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

impl Default for LoggerLevel {
    fn default() -> Self {
        Self(DEFAULT_FILTER.to_string())
    }
}

impl fmt::Display for LoggerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LoggerLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for LoggerLevel {
    type Error = LoggerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let s = s.trim().to_string();
        if s.is_empty() {
            return Err(LoggerError::InvalidLevel("empty filter".into()));
        }
        if let Err(e) = EnvFilter::try_new(&s) {
            return Err(LoggerError::InvalidLevel(format!("{s}: {e}")));
        }
        let stray = s
            .split(',')
            .map(str::trim)
            .find(|d| !d.is_empty() && !d.contains('=') && !is_level(d));
        match stray {
            Some(d) => Err(LoggerError::InvalidLevel(format!("{s}: unknown level `{d}`"))),
            None => Ok(LoggerLevel(s)),
        }
    }
}

fn is_level(word: &str) -> bool {
    LEVELS.iter().any(|l| l.eq_ignore_ascii_case(word))
}

impl From<LoggerLevel> for String {
    fn from(l: LoggerLevel) -> Self {
        l.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_directives() {
        for ok in ["info", "warn", "hng_core=trace,hng_groq=debug,info"] {
            assert!(ok.parse::<LoggerLevel>().is_ok(), "{ok}");
        }
    }

    #[test]
    fn rejects_bad_directives() {
        for bad in ["", "   ", "hng_core=verbose", "a=trace,b=wat"] {
            assert!(bad.parse::<LoggerLevel>().is_err(), "{bad}");
        }
    }

    #[test]
    fn rejects_bare_words_that_are_not_levels() {
        for bad in ["dbug", "verbose", "loud", "hng_core=debug,verbose"] {
            assert!(bad.parse::<LoggerLevel>().is_err(), "{bad}");
        }
        for ok in ["DEBUG", "Off", "hng_core=debug,INFO"] {
            assert!(ok.parse::<LoggerLevel>().is_ok(), "{ok}");
        }
    }

    #[test]
    fn default_is_info() {
        assert_eq!(LoggerLevel::default().as_str(), "info");
    }

    #[test]
    fn deserializes_from_plain_string() {
        let lvl: LoggerLevel = serde_json::from_str(r#""debug""#).unwrap();
        assert_eq!(lvl.as_str(), "debug");
        assert!(serde_json::from_str::<LoggerLevel>(r#""loud""#).is_err());
    }
}
