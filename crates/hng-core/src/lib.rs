pub mod batch;
pub mod credential;
pub mod error;
pub mod metrics;
pub mod store;
pub mod throttler;

pub use batch::{BatchCoordinator, BatchFailure, BatchReport, DEFAULT_GROUP_SIZE, ProgressFn};
pub use credential::{CredentialError, CredentialStore};
pub use error::CoreError;
pub use metrics::{AttemptOutcome, MetricsBackend, MetricsHandle, NoOpMetrics, noop_metrics};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError, StoreHandle, StoreMap};
pub use throttler::{RequestError, RequestHandle, RequestId, RequestThrottler, ThrottlerContext};

pub mod prelude {
    pub use crate::batch::{BatchCoordinator, ProgressFn};
    pub use crate::credential::CredentialStore;
    pub use crate::error::CoreError;
    pub use crate::store::{KeyValueStore, StoreHandle};
    pub use crate::throttler::{RequestError, RequestThrottler, ThrottlerContext};
}
