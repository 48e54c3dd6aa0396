use std::ops::{Deref, DerefMut};

use tracing::error;

use crate::error::MetaResult;
use crate::ledger::Metadata;

/// Scoped `start`/`stop` pair around a [`Metadata`] ledger.
///
/// Created by [`Metadata::session`]. Call [`finish`](Self::finish) to stop
/// the ledger and observe any persistence error. If the guard is dropped
/// without `finish` (early return, panic unwinding) the ledger is still
/// stopped and a failure is logged.
pub struct MetadataSession<'a> {
    metadata: &'a mut Metadata,
    finished: bool,
}

impl<'a> MetadataSession<'a> {
    pub(crate) fn begin(metadata: &'a mut Metadata) -> MetaResult<Self> {
        metadata.start()?;
        Ok(Self {
            metadata,
            finished: false,
        })
    }

    /// Stop the ledger, persisting every fact added during the session.
    pub fn finish(mut self) -> MetaResult<()> {
        self.finished = true;
        self.metadata.stop()
    }
}

impl Deref for MetadataSession<'_> {
    type Target = Metadata;

    fn deref(&self) -> &Self::Target {
        self.metadata
    }
}

impl DerefMut for MetadataSession<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.metadata
    }
}

impl Drop for MetadataSession<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.metadata.stop() {
            error!(
                store = %self.metadata.store().display(),
                error = %e,
                "failed to persist metadata on drop"
            );
        }
    }
}
