use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Output flavour requested from the model.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationStyle {
    /// English to Hindi written in Latin letters.
    #[default]
    Hinglish,
    /// English to Hindi in Devanagari script.
    Hindi,
    /// Hindi to romanized Hindi.
    Roman,
    /// Professional Hinglish.
    Formal,
    /// Conversational Hinglish.
    Casual,
}

impl TranslationStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TranslationStyle::Hinglish => "hinglish",
            TranslationStyle::Hindi => "hindi",
            TranslationStyle::Roman => "roman",
            TranslationStyle::Formal => "formal",
            TranslationStyle::Casual => "casual",
        }
    }
}

impl fmt::Display for TranslationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationStyle {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hinglish" | "" => Ok(TranslationStyle::Hinglish),
            "hindi" => Ok(TranslationStyle::Hindi),
            "roman" => Ok(TranslationStyle::Roman),
            "formal" => Ok(TranslationStyle::Formal),
            "casual" => Ok(TranslationStyle::Casual),
            other => Err(ModelError::UnknownStyle(other.to_string())),
        }
    }
}
