use hng_model::Progress;

use crate::batch::ProgressFn;

/// Emits [`Progress::Done`] exactly once, when dropped.
///
/// Held for the whole batch so the terminal signal also fires if the batch future panics or is dropped.
pub(crate) struct DoneGuard {
    listener: Option<ProgressFn>,
}

impl DoneGuard {
    pub(crate) fn new(listener: Option<ProgressFn>) -> Self {
        Self { listener }
    }

    pub(crate) fn report(&self, progress: Progress) {
        if let Some(listener) = &self.listener {
            listener(progress);
        }
    }
}

impl Drop for DoneGuard {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener(Progress::Done);
        }
    }
}
