use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// How a page is split into translatable fragments by the caller.
///
/// The core does not walk documents; the mode is stored so every client splits pages the same way.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationMode {
    /// One fragment per block element that holds a single text node.
    #[default]
    Paragraphs,
    /// One fragment per non-empty text node.
    AllText,
}

impl FromStr for TranslationMode {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paragraphs" | "" => Ok(TranslationMode::Paragraphs),
            "alltext" | "all-text" | "all" => Ok(TranslationMode::AllText),
            other => Err(ModelError::UnknownMode(other.to_string())),
        }
    }
}
