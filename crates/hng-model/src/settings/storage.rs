use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Retention class of a stored credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageClass {
    /// Kept for the lifetime of the process only.
    Session,
    /// Survives restarts.
    Persistent,
}

impl StorageClass {
    /// Map the persisted session-only flag to a class.
    pub const fn from_session_flag(session_only: bool) -> Self {
        if session_only {
            StorageClass::Session
        } else {
            StorageClass::Persistent
        }
    }

    pub const fn is_session(&self) -> bool {
        matches!(self, StorageClass::Session)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            StorageClass::Session => "session",
            StorageClass::Persistent => "persistent",
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageClass {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" => Ok(StorageClass::Session),
            "persistent" | "local" => Ok(StorageClass::Persistent),
            other => Err(ModelError::UnknownStorageClass(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StorageClass;

    #[test]
    fn flag_maps_to_class() {
        assert_eq!(StorageClass::from_session_flag(true), StorageClass::Session);
        assert_eq!(
            StorageClass::from_session_flag(false),
            StorageClass::Persistent
        );
    }

    #[test]
    fn displays_display_names() {
        assert_eq!(StorageClass::Session.to_string(), "session");
        assert_eq!(StorageClass::Persistent.to_string(), "persistent");
    }
}
