//! Sharded tree store.
//!
//! Samples are numbered sequentially by an [`Index`] and each number is
//! mapped to a three-level directory path by [`Shard`]:
//!
//! ```text
//! <container>/<identifier>/
//!     index.json
//!     samples/000/000/000/
//!     samples/000/000/001/
//!     ...
//!     samples/000/001/001/   (sample 257)
//! ```
//!
//! No directory in the tree ever holds more than 256 entries, which keeps
//! lookups fast for up to 16,777,216 samples.

use std::fs::{self, DirBuilder};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use shelf_types::{ensure_directory, get_resource, remove_directory, SampleId, Shard};
use tracing::{debug, error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::home::StoreHome;
use crate::index::Index;
use crate::traits::Store;

/// A store that allocates numbered sample homes in a sharded directory tree.
///
/// Allocation is serialized by an in-process mutex, so a `TreeStore` can be
/// shared between threads. Separate processes must not open the same store.
#[derive(Debug)]
pub struct TreeStore {
    home: StoreHome,
    samples: PathBuf,
    index: Mutex<Index>,
}

impl TreeStore {
    /// Open (creating if absent) the tree store `<container>/<identifier>`.
    ///
    /// On restart the index is reloaded from `index.json`. If the shard the
    /// index points at already exists, a previous run created it but crashed
    /// before the index advance was persisted; such shards are adopted and
    /// the index moves past them.
    pub fn open(container: &Path, identifier: &str) -> StoreResult<Self> {
        let home = StoreHome::resolve(container, identifier)?;
        let samples = home.samples()?;
        let resource = get_resource(home.path(), "index", ".json")?;
        let mut index = Index::open(&resource)?;
        recover(&mut index, &samples)?;

        Ok(Self {
            home,
            samples,
            index: Mutex::new(index),
        })
    }

    /// Directory holding the shard tree.
    pub fn samples(&self) -> &Path {
        &self.samples
    }

    /// The current allocation counter: the number of samples allocated.
    pub fn index(&self) -> u32 {
        self.lock_index().current()
    }

    /// Allocate the next sample and return its home directory.
    pub fn allocate_sample_home(&self) -> StoreResult<PathBuf> {
        self.allocate_sample().map(|(_, path)| path)
    }

    /// Allocate the next sample, returning its identifier and home.
    ///
    /// The shard directory is created first and must not already exist; a
    /// collision means the index and the filesystem disagree and is reported
    /// as [`StoreError::AlreadyExists`]. The index is advanced only after
    /// the directory exists; if advancing fails the directory is removed
    /// again, so a later call can retry the same identifier.
    pub fn allocate_sample(&self) -> StoreResult<(SampleId, PathBuf)> {
        let mut index = self.lock_index();
        let current = index.current();
        let id = SampleId::new(current as u64)
            .map_err(|_| StoreError::Exhausted { index: current })?;
        let sample_home = id.shard().under(&self.samples);

        if let Some(parent) = sample_home.parent() {
            ensure_directory(parent)?;
        }
        create_leaf(&sample_home).map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                error!(
                    sample = %id,
                    path = %sample_home.display(),
                    "shard already exists; index and filesystem out of sync"
                );
                StoreError::AlreadyExists {
                    path: sample_home.clone(),
                }
            } else {
                StoreError::Io(e)
            }
        })?;

        if let Err(e) = index.allocate_next() {
            // The index did not advance; the leaf must not outlive it.
            if let Err(cleanup) = fs::remove_dir(&sample_home) {
                error!(
                    sample = %id,
                    path = %sample_home.display(),
                    error = %cleanup,
                    "failed to remove shard after index persist failure"
                );
            }
            return Err(e);
        }
        debug!(sample = %id, path = %sample_home.display(), "sample allocated");
        Ok((id, sample_home))
    }

    /// Home of sample `id`. Pure path computation: nothing is allocated or
    /// checked.
    pub fn sample_home(&self, id: SampleId) -> PathBuf {
        id.shard().under(&self.samples)
    }

    /// Sample homes for identifiers `[0, top)`.
    ///
    /// `None` means "up to the current index". A `top` beyond the current
    /// index is [`StoreError::OutOfRange`]. The returned iterator is lazy,
    /// finite, and can be cloned to restart it.
    pub fn iterate(&self, top: Option<u32>) -> StoreResult<SampleHomes> {
        let current = self.index();
        let top = match top {
            None => current,
            Some(top) if top <= current => top,
            Some(top) => {
                error!(top, index = current, "TreeStore.iterate: top out of range");
                return Err(StoreError::OutOfRange {
                    top,
                    index: current,
                });
            }
        };
        Ok(SampleHomes {
            samples: self.samples.clone(),
            next: 0,
            top,
        })
    }

    /// Remove the entire store, index included.
    pub fn erase(self) -> StoreResult<()> {
        info!(home = %self.home.path().display(), "erasing tree store");
        remove_directory(self.home.path())?;
        Ok(())
    }

    fn lock_index(&self) -> MutexGuard<'_, Index> {
        // The index persists before it mutates, so a panicking holder cannot
        // leave it half-updated.
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for TreeStore {
    fn kind(&self) -> &'static str {
        "TreeStore"
    }

    fn home(&self) -> &Path {
        self.home.path()
    }

    fn start(&self) -> StoreResult<()> {
        info!(index = self.index(), "treestore.start()");
        Ok(())
    }

    fn stop(&self) -> StoreResult<()> {
        info!(index = self.index(), "treestore.stop()");
        Ok(())
    }
}

/// Lazy sequence of tree store sample homes for identifiers `[next, top)`.
#[derive(Clone, Debug)]
pub struct SampleHomes {
    samples: PathBuf,
    next: u32,
    top: u32,
}

impl Iterator for SampleHomes {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.top {
            return None;
        }
        let shard = Shard::from_id(SampleId::new(self.next as u64).ok()?);
        self.next += 1;
        Some(shard.under(&self.samples))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.top.saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SampleHomes {}

fn create_leaf(path: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path)
}

fn recover(index: &mut Index, samples: &Path) -> StoreResult<()> {
    loop {
        let current = index.current();
        let Ok(id) = SampleId::new(current as u64) else {
            return Ok(());
        };
        let orphan = id.shard().under(samples);
        if !orphan.is_dir() {
            return Ok(());
        }
        warn!(
            sample = %id,
            path = %orphan.display(),
            "shard exists beyond persisted index; advancing index"
        );
        index.allocate_next()?;
    }
}
