use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::debug;

use crate::error::{CatalogError, CatalogResult};

/// A string-keyed table of `V` with existence-aware mutation.
///
/// Each operation touches exactly one key. A failed operation leaves the
/// table unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog<V> {
    table: HashMap<String, V>,
}

impl<V> Catalog<V> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Insert a new entry. Fails if `key` is already present.
    pub fn create(&mut self, key: impl Into<String>, value: V) -> CatalogResult<()> {
        match self.table.entry(key.into()) {
            Entry::Occupied(slot) => Err(CatalogError::AlreadyExists {
                key: slot.key().clone(),
            }),
            Entry::Vacant(slot) => {
                debug!(key = %slot.key(), "catalog create");
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Replace an existing entry. Fails if `key` is absent.
    pub fn update(&mut self, key: &str, value: V) -> CatalogResult<()> {
        let slot = self.table.get_mut(key).ok_or_else(|| CatalogError::NotFound {
            key: key.to_string(),
        })?;
        *slot = value;
        debug!(key, "catalog update");
        Ok(())
    }

    /// Remove an existing entry and return it. Fails if `key` is absent.
    pub fn delete(&mut self, key: &str) -> CatalogResult<V> {
        let value = self.table.remove(key).ok_or_else(|| CatalogError::NotFound {
            key: key.to_string(),
        })?;
        debug!(key, "catalog delete");
        Ok(value)
    }

    /// Borrow the value for `key`, if present.
    pub fn lookup(&self, key: &str) -> Option<&V> {
        self.table.get(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.table.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl<V: Clone> Catalog<V> {
    /// The value for `key`, or `fallback` when absent. Never fails.
    pub fn get(&self, key: &str, fallback: V) -> V {
        self.table.get(key).cloned().unwrap_or(fallback)
    }

    /// A copy of the whole table. Mutating the copy does not affect the
    /// catalog.
    pub fn table(&self) -> HashMap<String, V> {
        self.table.clone()
    }
}

impl<V> Default for Catalog<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get() {
        let mut catalog = Catalog::new();
        catalog.create("a", 1).unwrap();
        assert_eq!(catalog.get("a", 0), 1);
        assert_eq!(catalog.lookup("a"), Some(&1));
        assert!(catalog.contains("a"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn duplicate_create_fails_and_keeps_original() {
        let mut catalog = Catalog::new();
        catalog.create("a", 1).unwrap();

        let err = catalog.create("a", 2).unwrap_err();
        assert_eq!(err, CatalogError::AlreadyExists { key: "a".into() });
        assert_eq!(catalog.get("a", 0), 1);
    }

    #[test]
    fn update_requires_presence() {
        let mut catalog: Catalog<i32> = Catalog::new();
        let err = catalog.update("a", 5).unwrap_err();
        assert_eq!(err, CatalogError::NotFound { key: "a".into() });
        assert!(catalog.is_empty());

        catalog.create("a", 1).unwrap();
        catalog.update("a", 5).unwrap();
        assert_eq!(catalog.get("a", 0), 5);
    }

    #[test]
    fn delete_missing_fails() {
        let mut catalog: Catalog<i32> = Catalog::new();
        let err = catalog.delete("missing").unwrap_err();
        assert_eq!(
            err,
            CatalogError::NotFound {
                key: "missing".into()
            }
        );
        assert_eq!(catalog.get("missing", 0), 0);
    }

    #[test]
    fn delete_returns_value_and_frees_key() {
        let mut catalog = Catalog::new();
        catalog.create("a", "one".to_string()).unwrap();
        assert_eq!(catalog.delete("a").unwrap(), "one");
        assert!(!catalog.contains("a"));
        catalog.create("a", "two".to_string()).unwrap();
        assert_eq!(catalog.get("a", String::new()), "two");
    }

    #[test]
    fn table_is_a_copy() {
        let mut catalog = Catalog::new();
        catalog.create("a", 1).unwrap();

        let mut copy = catalog.table();
        copy.insert("b".into(), 2);
        copy.insert("a".into(), 9);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("a", 0), 1);
        assert!(!catalog.contains("b"));
    }

    #[test]
    fn keys_are_sorted() {
        let mut catalog = Catalog::new();
        for key in ["b", "c", "a"] {
            catalog.create(key, ()).unwrap();
        }
        assert_eq!(catalog.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn error_messages() {
        let exists = CatalogError::AlreadyExists { key: "k".into() };
        assert_eq!(exists.to_string(), "entry with key 'k' already exists");
        let missing = CatalogError::NotFound { key: "k".into() };
        assert_eq!(missing.to_string(), "entry with key 'k' not found");
    }
}
