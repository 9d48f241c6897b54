//! Cooperative cancellation for multi-path workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One-shot stop signal shared by the workers of a multi-path call.
///
/// Workers poll it at every frontier dequeue or recursive build step;
/// nothing is interrupted mid-step.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}
