use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Balance between Hindi and English vocabulary in the output.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LanguageLevel {
    #[default]
    Balanced,
    MoreHindi,
    MoreEnglish,
}

impl LanguageLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LanguageLevel::Balanced => "balanced",
            LanguageLevel::MoreHindi => "moreHindi",
            LanguageLevel::MoreEnglish => "moreEnglish",
        }
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageLevel {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" | "" => Ok(LanguageLevel::Balanced),
            "morehindi" | "more-hindi" => Ok(LanguageLevel::MoreHindi),
            "moreenglish" | "more-english" => Ok(LanguageLevel::MoreEnglish),
            other => Err(ModelError::UnknownLevel(other.to_string())),
        }
    }
}
