//! Attribute metadata ledger for shelf.
//!
//! The [`Metadata`] ledger records facts about arbitrary entities: for each
//! identifier (a sample id, a store name, `"."` for the ledger itself) it
//! keeps a set of named attributes, each holding a small flat
//! [`ValueRecord`] of string facts. Writing an attribute again replaces the
//! previous value.
//!
//! # Persistence
//!
//! The ledger lives in memory between [`Metadata::start`] and
//! [`Metadata::stop`]. `stop` rewrites the backing `store.json` file as one
//! [`FactRecord`] per line:
//!
//! ```text
//! {"identifier":".","attribute":"creation","value":{"timestamp":"20240307090502"}}
//! {"identifier":"42","attribute":"source","value":{"url":"https://example.org"}}
//! ```
//!
//! Opening replays every line in order, so the file is always a valid source
//! of truth for the overwrite-tolerant state. Use [`Metadata::session`] to
//! guarantee `stop` runs.

pub mod error;
pub mod ledger;
pub mod record;
pub mod session;

pub use error::{MetaError, MetaResult};
pub use ledger::Metadata;
pub use record::{FactRecord, ValueRecord};
pub use session::MetadataSession;
