use thiserror::Error;

use hng_model::ModelError;

use crate::{credential::CredentialError, store::StoreError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid throttle strategy: {0}")]
    InvalidStrategy(#[from] ModelError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
}
