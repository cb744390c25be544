mod error;
pub use error::GroqError;

mod config;
pub use config::{ChatConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL};

pub mod client;
pub use client::ChatClient;

pub mod prompt;
pub mod text;

mod translator;
pub use translator::{ApiUsage, KeyStatus, NOT_CONFIGURED, Translator};
