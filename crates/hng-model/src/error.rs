use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown api status: {0}")]
    UnknownStatus(String),

    #[error("unknown retry placement: {0}")]
    UnknownPlacement(String),

    #[error("unknown translation style: {0}")]
    UnknownStyle(String),

    #[error("unknown language level: {0}")]
    UnknownLevel(String),

    #[error("unknown translation mode: {0}")]
    UnknownMode(String),

    #[error("unknown storage class: {0}")]
    UnknownStorageClass(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
