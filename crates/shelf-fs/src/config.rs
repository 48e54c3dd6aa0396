use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use shelf_types::{Timestamp, DEFAULT_UTC_OFFSET_HOURS};

use crate::error::{FsError, FsResult};

/// Already-resolved locations and options for a [`FileSystem`](crate::FileSystem).
///
/// Loaded from TOML; every field is optional:
///
/// ```toml
/// info_home = "~/Info/scraper/1.0.0/live"
/// software_home = "~/Software/scraper/1.0.0"
/// log_level = "INFO"
/// utc_offset_hours = -3
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSystemConfig {
    /// Where data, metadata, results, reports and logs live.
    pub info_home: PathBuf,
    /// Where the software and its templates live.
    pub software_home: PathBuf,
    /// One of `NOTSET`, `DEBUG`, `INFO`, `WARN`, `ERROR`, `CRITICAL`.
    pub log_level: String,
    /// Hours east of UTC used when rendering timestamps.
    pub utc_offset_hours: i32,
}

impl Default for FileSystemConfig {
    fn default() -> Self {
        Self {
            info_home: PathBuf::from("~/Info"),
            software_home: PathBuf::from("~/Software"),
            log_level: "DEBUG".to_string(),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

impl FileSystemConfig {
    /// Configuration rooted at explicit homes, defaults elsewhere.
    pub fn with_homes(info_home: impl Into<PathBuf>, software_home: impl Into<PathBuf>) -> Self {
        Self {
            info_home: info_home.into(),
            software_home: software_home.into(),
            ..Default::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> FsResult<Self> {
        toml::from_str(source).map_err(|e| FsError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> FsResult<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// The configured timestamp offset.
    pub fn utc_offset(&self) -> FsResult<FixedOffset> {
        Ok(Timestamp::offset_from_hours(self.utc_offset_hours)?)
    }
}
