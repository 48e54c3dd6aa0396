//! Durable allocation counter.
//!
//! The [`Index`] is a single non-negative integer persisted in a small JSON
//! file:
//!
//! ```text
//! {"index": "42"}
//! ```
//!
//! The value is stored as decimal text. Every mutation rewrites the file
//! through a temporary sibling that is synced and renamed into place, so a
//! crash leaves either the previous or the new value on disk, never a torn
//! write.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shelf_types::{SampleId, SAMPLE_ID_LIMIT};
use tracing::{debug, error};

use crate::error::{StoreError, StoreResult};

/// On-disk shape of the index file.
#[derive(Debug, Serialize, Deserialize)]
struct IndexRecord {
    index: String,
}

/// A monotonically non-decreasing counter backed by one file.
///
/// `current()` always equals the number of allocations made since the file
/// was first created.
#[derive(Debug)]
pub struct Index {
    resource: PathBuf,
    value: u32,
}

impl Index {
    /// Open the index stored at `resource`.
    ///
    /// If the file exists its value is loaded; a malformed file is a fatal
    /// [`StoreError::CorruptState`]. Otherwise the counter starts at 0 and is
    /// persisted immediately.
    pub fn open(resource: &Path) -> StoreResult<Self> {
        if resource.exists() {
            let value = read_value(resource)?;
            debug!(resource = %resource.display(), value, "index restarted");
            Ok(Self {
                resource: resource.to_path_buf(),
                value,
            })
        } else {
            let index = Self {
                resource: resource.to_path_buf(),
                value: 0,
            };
            index.persist(0)?;
            debug!(resource = %resource.display(), "index initialized");
            Ok(index)
        }
    }

    /// Path of the backing file.
    pub fn resource(&self) -> &Path {
        &self.resource
    }

    /// The current counter value, without mutating it.
    pub fn current(&self) -> u32 {
        self.value
    }

    /// Hand out the current value and advance the counter by one.
    ///
    /// The advanced value is persisted before it becomes visible in memory,
    /// so a failed write leaves the counter unchanged.
    pub fn allocate_next(&mut self) -> StoreResult<SampleId> {
        let allocated = SampleId::new(self.value as u64)
            .map_err(|_| StoreError::Exhausted { index: self.value })?;
        let next = self.value + 1;
        self.persist(next)?;
        self.value = next;
        Ok(allocated)
    }

    fn persist(&self, value: u32) -> StoreResult<()> {
        let record = IndexRecord {
            index: value.to_string(),
        };
        let bytes =
            serde_json::to_vec(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = self.resource.parent().ok_or_else(|| {
            StoreError::Io(io::Error::other("index resource has no parent directory"))
        })?;
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(&bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.resource).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

fn read_value(resource: &Path) -> StoreResult<u32> {
    let contents = fs::read(resource)?;
    let corrupt = |reason: String| {
        error!(resource = %resource.display(), %reason, "corrupt index file");
        StoreError::CorruptState {
            path: resource.to_path_buf(),
            reason,
        }
    };

    let record: IndexRecord =
        serde_json::from_slice(&contents).map_err(|e| corrupt(e.to_string()))?;
    let value: u32 = record
        .index
        .trim()
        .parse()
        .map_err(|_| corrupt(format!("index value {:?} is not a counter", record.index)))?;
    if value > SAMPLE_ID_LIMIT {
        return Err(corrupt(format!(
            "index value {value} exceeds limit {SAMPLE_ID_LIMIT}"
        )));
    }
    Ok(value)
}
