use shelf_catalog::CatalogError;
use shelf_meta::MetaError;
use shelf_store::StoreError;
use shelf_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("metadata error: {0}")]
    Meta(#[from] MetaError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FsResult<T> = Result<T, FsError>;
