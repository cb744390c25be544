use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential is empty")]
    Empty,

    #[error("credential contains a character outside Latin-1 at byte {0}")]
    Encode(usize),

    #[error("stored credential is corrupt: {0}")]
    Decode(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
