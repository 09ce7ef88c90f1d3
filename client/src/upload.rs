use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

/// Handle to the client's upload subsystem.
///
/// The transfer machinery lives in the UI layer; the client core only
/// switches it on when the server advertises upload support.
#[derive(Debug, Default)]
pub struct UploadManager {
    initialized: AtomicBool,
}

impl UploadManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable uploads. Idempotent; only the first call takes effect.
    pub fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("upload subsystem already initialized");
            return;
        }
        info!("upload subsystem initialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }
}
