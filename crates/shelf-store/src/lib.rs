//! Filesystem sample stores for shelf.
//!
//! A store owns a home directory under a caller-supplied container and hands
//! out "sample homes": directories where a higher-level pipeline writes one
//! unit of payload in whatever format it likes. The store only manages where
//! things live, never what is inside them.
//!
//! # Stores
//!
//! - [`TreeStore`] -- allocates sequential [`SampleId`](shelf_types::SampleId)s
//!   from a durable [`Index`] and places each sample in a three-level,
//!   256-way sharded directory tree (`samples/000/001/001`).
//! - [`FlatStore`] -- one directory per caller-supplied string key
//!   (`samples/<key>`), enumerated in lexicographic order.
//! - [`StoreHome`] -- the bare home directory; the base every store builds on.
//!
//! All stores implement the [`Store`] trait for their `start`/`stop`
//! lifecycle hooks.
//!
//! # Design Rules
//!
//! 1. Sample homes are created once and never reused.
//! 2. Every index mutation is persisted before it is observable.
//! 3. A shard that already exists when it is about to be allocated is an
//!    error, never silently adopted.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod flat;
pub mod home;
pub mod index;
pub mod task;
pub mod traits;
pub mod tree;

pub use error::{StoreError, StoreResult};
pub use flat::FlatStore;
pub use home::StoreHome;
pub use index::Index;
pub use task::{SampleTask, SampleTaskPipeline};
pub use traits::Store;
pub use tree::{SampleHomes, TreeStore};
