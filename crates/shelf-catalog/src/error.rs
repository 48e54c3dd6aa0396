//! Error types for catalog operations.

use thiserror::Error;

/// Errors that can occur during catalog mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// `create` was called for a key that is already present.
    #[error("entry with key '{key}' already exists")]
    AlreadyExists { key: String },

    /// `update` or `delete` was called for a key that is absent.
    #[error("entry with key '{key}' not found")]
    NotFound { key: String },
}

/// Convenience type alias for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
