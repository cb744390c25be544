use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroqError {
    #[error("invalid chat client configuration: {0}")]
    InvalidConfig(String),

    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}
