mod domain;
pub use domain::keys;
pub use domain::{DelayMs, TimeoutMs};

mod error;
pub use error::{ModelError, ModelResult};

mod progress;
pub use progress::Progress;

mod settings;
pub use settings::{LanguageLevel, StorageClass, TranslationMode, TranslationSettings, TranslationStyle};

mod status;
pub use status::LastStatus;

mod strategy;
pub use strategy::{RetryPlacement, ThrottleStrategy};
