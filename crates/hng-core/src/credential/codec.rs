//! Reversible obfuscation applied to credentials at rest.
//!
//! Standard base64 over the Latin-1 bytes of the secret, compatible with values written by `btoa`.
//! This hides the key from casual inspection of the storage file and nothing more.
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::credential::CredentialError;

/// Encode a secret for storage.
pub fn encode(secret: &str) -> Result<String, CredentialError> {
    if secret.is_empty() {
        return Err(CredentialError::Empty);
    }
    let mut bytes = Vec::with_capacity(secret.len());
    for (at, ch) in secret.char_indices() {
        let code = u32::from(ch);
        if code > 0xFF {
            return Err(CredentialError::Encode(at));
        }
        bytes.push(code as u8);
    }
    Ok(STANDARD.encode(bytes))
}

/// Decode a stored value back into the secret.
///
/// Fails only on invalid or empty base64. Every byte maps to the Latin-1 character of the
/// same code, as `atob` does, so byte sequences that are not UTF-8 still decode.
///
/// # Examples
/// ```
/// use hng_core::credential::{decode, encode};
///
/// let stored = encode("secret123").unwrap();
/// assert_eq!(stored, "c2VjcmV0MTIz");
/// assert_eq!(decode(&stored).unwrap(), "secret123");
/// assert!(decode("%%%").is_err());
/// ```
pub fn decode(stored: &str) -> Result<String, CredentialError> {
    let bytes = STANDARD
        .decode(stored.trim())
        .map_err(|e| CredentialError::Decode(e.to_string()))?;
    if bytes.is_empty() {
        return Err(CredentialError::Decode("empty payload".into()));
    }
    Ok(bytes.into_iter().map(char::from).collect())
}
