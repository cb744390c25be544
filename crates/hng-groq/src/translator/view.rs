use serde::{Deserialize, Serialize};

use hng_model::{LastStatus, StorageClass};

/// Usage counters exposed to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUsage {
    pub call_count: u64,
    pub last_status: Option<LastStatus>,
}

/// Presence and retention class of the API credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatus {
    pub has_key: bool,
    pub storage_type: Option<StorageClass>,
}
