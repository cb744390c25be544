use std::{fmt, sync::Arc};

use crate::{
    metrics::MetricsHandle,
    store::{MemoryStore, StoreHandle},
};

/// Shared dependencies injected into a throttler.
#[derive(Clone)]
pub struct ThrottlerContext {
    store: StoreHandle,
    metrics: MetricsHandle,
}

impl ThrottlerContext {
    /// Create a new context with the given store and metrics backend.
    pub fn new(store: StoreHandle, metrics: MetricsHandle) -> Self {
        Self { store, metrics }
    }

    /// Store that receives the call counter and last status.
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Get a clonable handle to the metrics backend.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Replace the store and return updated context.
    pub fn with_store(mut self, store: StoreHandle) -> Self {
        self.store = store;
        self
    }

    /// Replace the metrics backend and return updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }
}

impl Default for ThrottlerContext {
    fn default() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            metrics: crate::metrics::noop_metrics(),
        }
    }
}

impl fmt::Debug for ThrottlerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThrottlerContext")
            .field("store", &"<handle>")
            .field("metrics", &"<handle>")
            .finish()
    }
}
