mod level;
pub use level::LanguageLevel;

mod mode;
pub use mode::TranslationMode;

mod storage;
pub use storage::StorageClass;

mod style;
pub use style::TranslationStyle;

use serde::{Deserialize, Serialize};

/// User-facing translation preferences.
///
/// Persisted field by field under the keys in [`crate::keys`]; missing fields fall back to their defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationSettings {
    /// Target register / script of the output.
    pub style: TranslationStyle,
    /// Hindi vs English word balance.
    pub level: LanguageLevel,
    /// How a page is split into fragments.
    pub mode: TranslationMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let s = TranslationSettings::default();
        assert_eq!(s.style, TranslationStyle::Hinglish);
        assert_eq!(s.level, LanguageLevel::Balanced);
        assert_eq!(s.mode, TranslationMode::Paragraphs);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let s: TranslationSettings = serde_json::from_str(r#"{"level":"moreHindi"}"#).unwrap();
        assert_eq!(s.style, TranslationStyle::Hinglish);
        assert_eq!(s.level, LanguageLevel::MoreHindi);
    }
}
