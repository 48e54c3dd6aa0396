//! Generic in-memory keyed catalog.
//!
//! A [`Catalog`] is a string-keyed table with strict existence rules:
//! `create` requires the key to be absent, `update` and `delete` require it
//! to be present, and `get` never fails but returns a caller-supplied
//! fallback for missing keys. The catalog has no persistence of its own;
//! whoever owns it decides what, if anything, to write down.

pub mod catalog;
pub mod error;

pub use catalog::Catalog;
pub use error::{CatalogError, CatalogResult};
