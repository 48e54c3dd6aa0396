//! Filesystem context for shelf.
//!
//! A [`FileSystem`] lays out the standard containers of an application
//! (`Storage`, `Results`, `Logs`, ...) under an info home, owns the shared
//! [`Metadata`](shelf_meta::Metadata) ledger, and keeps a
//! [`Catalog`](shelf_catalog::Catalog) of the stores it has opened.
//!
//! [`run`] wraps a unit of work in the full lifecycle: build the filesystem,
//! start it, install logging, run, and always stop it so metadata is
//! persisted.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod lifecycle;
pub mod logging;

pub use config::FileSystemConfig;
pub use error::{FsError, FsResult};
pub use filesystem::FileSystem;
pub use lifecycle::run;
