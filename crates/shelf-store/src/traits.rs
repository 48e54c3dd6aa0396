use std::path::Path;

use tracing::info;

use crate::error::StoreResult;

/// Lifecycle and location shared by every sample store.
///
/// Implementations must satisfy these invariants:
/// - `home()` exists as a directory for the lifetime of the store.
/// - `start()` and `stop()` are cheap hooks; the defaults only log. Stores
///   override them to report their own state.
pub trait Store {
    /// Short name of the store kind, used in log lines.
    fn kind(&self) -> &'static str;

    /// Root directory owned by this store.
    fn home(&self) -> &Path;

    /// Called before the store is used.
    fn start(&self) -> StoreResult<()> {
        info!(home = %self.home().display(), "{}.start()", self.kind());
        Ok(())
    }

    /// Called after the store is no longer used.
    fn stop(&self) -> StoreResult<()> {
        info!(home = %self.home().display(), "{}.stop()", self.kind());
        Ok(())
    }
}
