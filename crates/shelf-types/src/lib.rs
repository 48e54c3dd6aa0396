//! Foundation types for shelf.
//!
//! This crate provides the identifier, path, and temporal types shared by the
//! storage and metadata crates. Every other shelf crate depends on
//! `shelf-types`.
//!
//! # Key Types
//!
//! - [`SampleId`] -- Allocated sample identifier in the 24-bit range
//! - [`Shard`] -- Three-byte, 256-way directory decomposition of a [`SampleId`]
//! - [`Timestamp`] -- Wall-clock instant rendered in a fixed UTC offset
//!
//! The [`paths`] module holds the directory helpers every store uses to
//! resolve its home, containers, and resource files.

pub mod error;
pub mod paths;
pub mod sample;
pub mod temporal;

pub use error::TypeError;
pub use paths::{ensure_directory, get_container, get_resource, remove_directory};
pub use sample::{SampleId, Shard, SAMPLE_ID_LIMIT};
pub use temporal::{Timestamp, DEFAULT_UTC_OFFSET_HOURS};
