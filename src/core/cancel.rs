use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use super::error::{CatalogError, CatalogResult};

/// Shared cooperative cancellation flag.
///
/// Clones observe the same flag. Long-running operations check it between
/// files, never in the middle of one.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns [`CatalogError::Cancelled`] once cancellation was requested.
    pub fn check(&self) -> CatalogResult<()> {
        if self.is_cancelled() {
            Err(CatalogError::Cancelled)
        } else {
            Ok(())
        }
    }
}
