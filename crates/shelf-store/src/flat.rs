use std::fs;
use std::path::{Path, PathBuf};
use std::vec;

use shelf_types::get_container;
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::home::StoreHome;
use crate::traits::Store;

/// A store of sample homes keyed by caller-supplied strings.
///
/// Each key names one directory, `<home>/samples/<key>`. There is no
/// allocation counter; enumeration lists the directories in lexicographic
/// (byte) order, so callers that want numeric ordering must zero-pad their
/// keys.
#[derive(Clone, Debug)]
pub struct FlatStore {
    home: StoreHome,
    samples: PathBuf,
}

impl FlatStore {
    /// Open (creating if absent) the flat store `<container>/<identifier>`.
    pub fn open(container: &Path, identifier: &str) -> StoreResult<Self> {
        let home = StoreHome::resolve(container, identifier)?;
        let samples = home.samples()?;
        Ok(Self { home, samples })
    }

    /// Directory holding the sample homes.
    pub fn samples(&self) -> &Path {
        &self.samples
    }

    /// Resolve the home for `key`, creating it if absent. Idempotent.
    pub fn sample_home(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(get_container(&self.samples, key)?)
    }

    /// Keys of all current sample homes, sorted lexicographically.
    ///
    /// Only directories count; stray files under `samples` are ignored, as
    /// are names that are not valid UTF-8.
    pub fn sorted_keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.samples)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(key) => keys.push(key),
                Err(name) => warn!(?name, "skipping non UTF-8 sample directory"),
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Sample homes in the same order as [`sorted_keys`](Self::sorted_keys).
    ///
    /// The listing is taken when this is called; clone the iterator to walk
    /// the same snapshot again, or call again to see new samples.
    pub fn iterate(&self) -> StoreResult<vec::IntoIter<PathBuf>> {
        let homes: Vec<PathBuf> = self
            .sorted_keys()?
            .into_iter()
            .map(|key| self.samples.join(key))
            .collect();
        Ok(homes.into_iter())
    }
}

impl Store for FlatStore {
    fn kind(&self) -> &'static str {
        "FlatStore"
    }

    fn home(&self) -> &Path {
        self.home.path()
    }
}

fn validate_key(key: &str) -> StoreResult<()> {
    let invalid = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0');
    if invalid {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(dir: &tempfile::TempDir) -> FlatStore {
        FlatStore::open(dir.path(), "pages").unwrap()
    }

    #[test]
    fn open_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        assert_eq!(store.home(), dir.path().join("pages"));
        assert_eq!(store.samples(), dir.path().join("pages").join("samples"));
        assert!(store.samples().is_dir());
        assert!(store.sorted_keys().unwrap().is_empty());
    }

    #[test]
    fn sample_home_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);

        let first = store.sample_home("alpha").unwrap();
        fs::write(first.join("payload.txt"), b"data").unwrap();
        let second = store.sample_home("alpha").unwrap();

        assert_eq!(first, second);
        assert_eq!(first, store.samples().join("alpha"));
        assert!(second.join("payload.txt").exists());
        assert_eq!(store.sorted_keys().unwrap(), vec!["alpha"]);
    }

    #[test]
    fn keys_sorted_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        for key in ["b", "a", "c"] {
            store.sample_home(key).unwrap();
        }
        assert_eq!(store.sorted_keys().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn ordering_is_string_not_numeric() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        for key in ["10", "9", "100"] {
            store.sample_home(key).unwrap();
        }
        assert_eq!(store.sorted_keys().unwrap(), vec!["10", "100", "9"]);
    }

    #[test]
    fn keys_keep_dots() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.sample_home("report.v2").unwrap();
        assert_eq!(store.sorted_keys().unwrap(), vec!["report.v2"]);
    }

    #[test]
    fn stray_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.sample_home("a").unwrap();
        fs::write(store.samples().join("notes.txt"), b"x").unwrap();
        assert_eq!(store.sorted_keys().unwrap(), vec!["a"]);
    }

    #[test]
    fn iterate_matches_sorted_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        for key in ["b", "a", "c"] {
            store.sample_home(key).unwrap();
        }

        let homes: Vec<PathBuf> = store.iterate().unwrap().collect();
        let expected: Vec<PathBuf> = ["a", "b", "c"]
            .iter()
            .map(|k| store.samples().join(k))
            .collect();
        assert_eq!(homes, expected);
    }

    #[test]
    fn iterate_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        store.sample_home("x").unwrap();
        store.sample_home("y").unwrap();

        let homes = store.iterate().unwrap();
        let again = homes.clone();
        assert_eq!(homes.count(), 2);
        assert_eq!(again.count(), 2);
        assert_eq!(store.iterate().unwrap().count(), 2);
    }

    #[test]
    fn invalid_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        for key in ["", ".", "..", "a/b", "a\\b"] {
            let err = store.sample_home(key).unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey(_)), "key {key:?}");
        }
        assert!(store.sorted_keys().unwrap().is_empty());
    }

    #[test]
    fn reopen_sees_existing_samples() {
        let dir = tempfile::tempdir().unwrap();
        open(&dir).sample_home("kept").unwrap();
        assert_eq!(open(&dir).sorted_keys().unwrap(), vec!["kept"]);
    }

    #[test]
    fn lifecycle_hooks() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir);
        assert_eq!(store.kind(), "FlatStore");
        store.start().unwrap();
        store.stop().unwrap();
    }
}
