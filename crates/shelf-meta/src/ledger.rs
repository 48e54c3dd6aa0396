use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use shelf_types::{ensure_directory, get_resource, Timestamp};
use tracing::{debug, error, info};

use crate::error::{MetaError, MetaResult};
use crate::record::{FactLine, FactRecord, ValueRecord};
use crate::session::MetadataSession;

/// Identifier of the ledger's own bootstrap record.
pub const LEDGER_IDENTIFIER: &str = ".";

/// Attribute under which the ledger records its creation time.
pub const CREATION_ATTRIBUTE: &str = "creation";

/// Facts about one identifier, attributes in insertion order.
#[derive(Debug)]
struct Entity {
    identifier: String,
    attributes: Vec<(String, ValueRecord)>,
}

/// Two-level ledger: identifier -> attribute -> [`ValueRecord`].
///
/// Identifiers and the attributes within each identifier iterate in the
/// order they were first added. Re-adding an existing pair overwrites the
/// value but keeps its position.
#[derive(Debug)]
pub struct Metadata {
    directory: PathBuf,
    store: PathBuf,
    entities: Vec<Entity>,
    positions: HashMap<String, usize>,
}

impl Metadata {
    /// Open the ledger kept in `directory`.
    ///
    /// An existing `store.json` is replayed line by line. Otherwise the
    /// ledger is seeded with a `(".", "creation", {"timestamp": now})` record
    /// rendered in `offset`, and persisted immediately.
    pub fn open(directory: &Path, offset: FixedOffset) -> MetaResult<Self> {
        let directory = ensure_directory(directory)?;
        let store = get_resource(&directory, "store", ".json")?;
        let mut metadata = Self {
            directory,
            store,
            entities: Vec::new(),
            positions: HashMap::new(),
        };

        if metadata.store.exists() {
            metadata.read_records()?;
            debug!(
                store = %metadata.store.display(),
                records = metadata.len(),
                "metadata replayed"
            );
        } else {
            let timestamp = Timestamp::now(offset).to_string();
            metadata.add_item(
                LEDGER_IDENTIFIER,
                CREATION_ATTRIBUTE,
                [("timestamp".to_string(), timestamp)].into(),
            );
            metadata.write_records()?;
            info!(store = %metadata.store.display(), "metadata created");
        }
        Ok(metadata)
    }

    /// Directory holding the backing file.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the backing file.
    pub fn store(&self) -> &Path {
        &self.store
    }

    /// Record `value` for `(identifier, attribute)`, replacing any previous
    /// value. In-memory only until [`stop`](Self::stop).
    pub fn add_item(
        &mut self,
        identifier: impl Into<String>,
        attribute: impl Into<String>,
        value: ValueRecord,
    ) {
        let identifier = identifier.into();
        let attribute = attribute.into();

        let slot = match self.positions.get(&identifier) {
            Some(&slot) => slot,
            None => {
                let slot = self.entities.len();
                self.positions.insert(identifier.clone(), slot);
                self.entities.push(Entity {
                    identifier,
                    attributes: Vec::new(),
                });
                slot
            }
        };

        let attributes = &mut self.entities[slot].attributes;
        match attributes.iter_mut().find(|(name, _)| *name == attribute) {
            Some((_, existing)) => *existing = value,
            None => attributes.push((attribute, value)),
        }
    }

    /// The value recorded for `(identifier, attribute)`, if any.
    pub fn get(&self, identifier: &str, attribute: &str) -> Option<&ValueRecord> {
        let slot = *self.positions.get(identifier)?;
        self.entities[slot]
            .attributes
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, value)| value)
    }

    /// All `(identifier, attribute, value)` triples, identifiers in
    /// insertion order, then attributes in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (&str, &str, &ValueRecord)> + Clone + '_ {
        self.entities.iter().flat_map(|entity| {
            entity
                .attributes
                .iter()
                .map(move |(attribute, value)| {
                    (entity.identifier.as_str(), attribute.as_str(), value)
                })
        })
    }

    /// Known identifiers in insertion order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> + '_ {
        self.entities.iter().map(|entity| entity.identifier.as_str())
    }

    /// Number of stored triples.
    pub fn len(&self) -> usize {
        self.entities.iter().map(|e| e.attributes.len()).sum()
    }

    /// Returns `true` if no facts are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prepare for use. Nothing to do today.
    pub fn start(&mut self) -> MetaResult<()> {
        debug!(store = %self.store.display(), "metadata.start()");
        Ok(())
    }

    /// Persist the full table, overwriting the backing file.
    pub fn stop(&mut self) -> MetaResult<()> {
        self.write_records()?;
        debug!(
            store = %self.store.display(),
            records = self.len(),
            "metadata.stop()"
        );
        Ok(())
    }

    /// Start the ledger and return a guard that stops it when finished or
    /// dropped.
    pub fn session(&mut self) -> MetaResult<MetadataSession<'_>> {
        MetadataSession::begin(self)
    }

    fn read_records(&mut self) -> MetaResult<()> {
        let reader = BufReader::new(File::open(&self.store)?);
        for (number, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            if line.trim_ascii().is_empty() {
                continue;
            }
            let record: FactRecord = serde_json::from_slice(&line).map_err(|e| {
                error!(
                    store = %self.store.display(),
                    line = number + 1,
                    error = %e,
                    "corrupt metadata record"
                );
                MetaError::CorruptState {
                    path: self.store.clone(),
                    line: number + 1,
                    reason: e.to_string(),
                }
            })?;
            self.add_item(record.identifier, record.attribute, record.value);
        }
        Ok(())
    }

    fn write_records(&self) -> MetaResult<()> {
        let dir = self.store.parent().unwrap_or(self.directory.as_path());
        let temp = tempfile::NamedTempFile::new_in(dir)?;
        let mut writer = BufWriter::new(temp);
        for (identifier, attribute, value) in self.items() {
            let line = FactLine {
                identifier,
                attribute,
                value,
            };
            serde_json::to_writer(&mut writer, &line)
                .map_err(|e| MetaError::Serialization(e.to_string()))?;
            writer.write_all(b"\n")?;
        }
        let temp = writer.into_inner().map_err(|e| MetaError::Io(e.into_error()))?;
        temp.as_file().sync_all()?;
        temp.persist(&self.store).map_err(|e| MetaError::Io(e.error))?;
        Ok(())
    }
}
