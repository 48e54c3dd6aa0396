use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use shelf_catalog::Catalog;
use shelf_meta::Metadata;
use shelf_store::{FlatStore, Store, TreeStore};
use shelf_types::{ensure_directory, get_container, get_resource, remove_directory, Timestamp};
use tracing::info;

use crate::config::FileSystemConfig;
use crate::error::FsResult;

/// The directory layout, metadata ledger and store catalog of one
/// application.
///
/// ```text
/// <software_home>/templates/
/// <info_home>/Commands/
/// <info_home>/Storage/<store>/...
/// <info_home>/Secrets/
/// <info_home>/Results/
/// <info_home>/Reports/
/// <info_home>/Logs/
/// <info_home>/metadata/store.json
/// ```
#[derive(Debug)]
pub struct FileSystem {
    info_home: PathBuf,
    software_home: PathBuf,
    templates: PathBuf,
    commands: PathBuf,
    storage: PathBuf,
    secrets: PathBuf,
    results: PathBuf,
    reports: PathBuf,
    logs: PathBuf,
    metadata: Metadata,
    catalog: Catalog<PathBuf>,
    offset: FixedOffset,
}

impl FileSystem {
    /// Create (or reopen) the layout described by `config`.
    pub fn new(config: &FileSystemConfig) -> FsResult<Self> {
        let offset = config.utc_offset()?;
        let info_home = ensure_directory(&config.info_home)?;
        let software_home = ensure_directory(&config.software_home)?;

        let metadata = Metadata::open(&info_home.join("metadata"), offset)?;
        Ok(Self {
            templates: get_container(&software_home, "templates")?,
            commands: get_container(&info_home, "Commands")?,
            storage: get_container(&info_home, "Storage")?,
            secrets: get_container(&info_home, "Secrets")?,
            results: get_container(&info_home, "Results")?,
            reports: get_container(&info_home, "Reports")?,
            logs: get_container(&info_home, "Logs")?,
            info_home,
            software_home,
            metadata,
            catalog: Catalog::new(),
            offset,
        })
    }

    pub fn info_home(&self) -> &Path {
        &self.info_home
    }

    pub fn software_home(&self) -> &Path {
        &self.software_home
    }

    pub fn templates(&self) -> &Path {
        &self.templates
    }

    pub fn commands(&self) -> &Path {
        &self.commands
    }

    pub fn storage(&self) -> &Path {
        &self.storage
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn results(&self) -> &Path {
        &self.results
    }

    pub fn reports(&self) -> &Path {
        &self.reports
    }

    pub fn logs(&self) -> &Path {
        &self.logs
    }

    /// The shared metadata ledger.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Logical name -> home directory of every store opened through this
    /// filesystem.
    pub fn catalog(&self) -> &Catalog<PathBuf> {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog<PathBuf> {
        &mut self.catalog
    }

    /// Timestamp offset in effect for this filesystem.
    pub fn utc_offset(&self) -> FixedOffset {
        self.offset
    }

    /// Open the tree store `identifier` under `Storage` and record it in
    /// the catalog.
    pub fn tree_store(&mut self, identifier: &str) -> FsResult<TreeStore> {
        let store = TreeStore::open(&self.storage, identifier)?;
        self.register(identifier, store.home())?;
        Ok(store)
    }

    /// Open the flat store `identifier` under `Storage` and record it in
    /// the catalog.
    pub fn flat_store(&mut self, identifier: &str) -> FsResult<FlatStore> {
        let store = FlatStore::open(&self.storage, identifier)?;
        self.register(identifier, store.home())?;
        Ok(store)
    }

    /// A fresh log file path, `<Logs>/<identifier>_<timestamp>.txt`.
    pub fn log_resource(&self, identifier: &str) -> FsResult<PathBuf> {
        let timestamp = Timestamp::now(self.offset);
        Ok(get_resource(
            &self.logs,
            &format!("{identifier}_{timestamp}"),
            ".txt",
        )?)
    }

    pub fn start(&mut self) -> FsResult<()> {
        info!(info_home = %self.info_home.display(), "filesystem.start()");
        self.metadata.start()?;
        Ok(())
    }

    /// Persist the metadata ledger.
    pub fn stop(&mut self) -> FsResult<()> {
        self.metadata.stop()?;
        info!(info_home = %self.info_home.display(), "filesystem.stop()");
        Ok(())
    }

    /// Delete the whole info home. Software and templates are kept.
    pub fn clear(self) -> FsResult<()> {
        info!(info_home = %self.info_home.display(), "clearing filesystem");
        remove_directory(&self.info_home)?;
        Ok(())
    }

    fn register(&mut self, identifier: &str, home: &Path) -> FsResult<()> {
        if self.catalog.lookup(identifier).is_some_and(|known| known == home) {
            return Ok(());
        }
        if self.catalog.contains(identifier) {
            self.catalog.update(identifier, home.to_path_buf())?;
        } else {
            self.catalog.create(identifier, home.to_path_buf())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &tempfile::TempDir) -> FileSystemConfig {
        FileSystemConfig::with_homes(dir.path().join("info"), dir.path().join("software"))
    }

    #[test]
    fn new_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FileSystem::new(&config(&dir)).unwrap();

        let info = dir.path().join("info");
        assert_eq!(fs.info_home(), info);
        assert_eq!(fs.software_home(), dir.path().join("software"));
        assert_eq!(fs.templates(), dir.path().join("software").join("templates"));
        for (path, name) in [
            (fs.commands(), "Commands"),
            (fs.storage(), "Storage"),
            (fs.secrets(), "Secrets"),
            (fs.results(), "Results"),
            (fs.reports(), "Reports"),
            (fs.logs(), "Logs"),
        ] {
            assert_eq!(path, info.join(name));
            assert!(path.is_dir());
        }
        assert!(info.join("metadata").join("store.json").is_file());
        assert!(fs.catalog().is_empty());
    }

    #[test]
    fn stores_are_catalogued() {
        let dir = tempfile::tempdir().unwrap();
        let mut fs = FileSystem::new(&config(&dir)).unwrap();

        let tree = fs.tree_store("documents").unwrap();
        let flat = fs.flat_store("pages").unwrap();
        // Reopening the same store is fine.
        fs.tree_store("documents").unwrap();

        assert_eq!(tree.home(), fs.storage().join("documents"));
        assert_eq!(fs.catalog().keys(), vec!["documents", "pages"]);
        assert_eq!(
            fs.catalog().get("pages", PathBuf::new()),
            flat.home().to_path_buf()
        );
    }

    #[test]
    fn stop_persists_metadata() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut fs = FileSystem::new(&config(&dir)).unwrap();
            fs.start().unwrap();
            let store = fs.tree_store("documents").unwrap();
            let (id, _) = store.allocate_sample().unwrap();
            fs.metadata_mut().add_item(
                id.to_string(),
                "source",
                [("url".to_string(), "https://example.org".to_string())].into(),
            );
            fs.stop().unwrap();
        }

        let fs = FileSystem::new(&config(&dir)).unwrap();
        let source = fs.metadata().get("0", "source").unwrap();
        assert_eq!(source["url"], "https://example.org");
    }

    #[test]
    fn log_resource_is_timestamped() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FileSystem::new(&config(&dir)).unwrap();
        let log = fs.log_resource("scraper").unwrap();

        assert_eq!(log.parent().unwrap(), fs.logs());
        let name = log.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("scraper_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), "scraper_".len() + 14 + ".txt".len());
    }

    #[test]
    fn clear_removes_info_home_only() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FileSystem::new(&config(&dir)).unwrap();
        fs.clear().unwrap();

        assert!(!dir.path().join("info").exists());
        assert!(dir.path().join("software").join("templates").is_dir());
    }
}
