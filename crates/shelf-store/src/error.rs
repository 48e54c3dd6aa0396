use std::path::PathBuf;

use shelf_types::TypeError;

/// Errors from sample store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A directory that must be freshly created already exists.
    ///
    /// For a tree store this means the index and the filesystem disagree.
    #[error("sample home already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    /// An iteration bound outside `[0, index]` was requested.
    #[error("top {top} out of range [0, {index}]")]
    OutOfRange { top: u32, index: u32 },

    /// Every identifier in the 24-bit space has been allocated.
    #[error("sample identifier space exhausted at {index}")]
    Exhausted { index: u32 },

    /// A backing file is unreadable or malformed. Fatal: the store cannot
    /// guess the correct state.
    #[error("corrupt state in {}: {reason}", path.display())]
    CorruptState { path: PathBuf, reason: String },

    /// A flat store key that cannot name a single directory.
    #[error("invalid sample key: {0:?}")]
    InvalidKey(String),

    /// A sample task failed.
    #[error("task {identifier} failed: {reason}")]
    Task { identifier: String, reason: String },

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Identifier or shard construction failure.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
