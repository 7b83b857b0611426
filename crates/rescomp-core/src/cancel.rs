use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Error returned when a run observes a triggered [`CancelFlag`].
#[derive(Debug, thiserror::Error)]
#[error("run cancelled")]
pub struct Cancelled;

/// Cloneable cancellation flag checked cooperatively between rows, entities,
/// and relationships. Triggering it aborts the run before any output is
/// published.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates an untriggered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns `Err(Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
