//! Well-known storage keys.
//!
//! Every component that reads or writes the key-value store goes through these constants,
//! so the on-disk layout stays compatible across releases.

/// Lifetime number of successfully completed remote calls.
pub const API_CALL_COUNT: &str = "apiCallCount";

/// Status of the most recently settled or attempted request.
pub const LAST_API_STATUS: &str = "lastApiStatus";

/// Obfuscated API credential.
pub const API_KEY: &str = "groqApiKey";

/// `true` when the credential lives in the session store only.
pub const API_KEY_IN_SESSION: &str = "apiKeyInSession";

/// Onboarding marker set once a credential has been saved.
pub const API_KEY_SET: &str = "apiKeySet";

/// Selected [`crate::TranslationStyle`].
pub const TRANSLATION_STYLE: &str = "translationStyle";

/// Selected [`crate::LanguageLevel`].
pub const LANGUAGE_LEVEL: &str = "languageLevel";

/// Selected [`crate::TranslationMode`].
pub const TRANSLATION_MODE: &str = "translationMode";
