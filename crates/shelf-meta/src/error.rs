//! Error types for the metadata ledger.

use std::path::PathBuf;

/// Errors that can occur while loading or persisting metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// A line of the backing file is not a valid fact record. Fatal: the
    /// ledger refuses to guess what was meant.
    #[error("corrupt metadata in {} at line {line}: {reason}", path.display())]
    CorruptState {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Serialization failure while writing records.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for metadata results.
pub type MetaResult<T> = Result<T, MetaError>;
