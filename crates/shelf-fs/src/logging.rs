//! Log file setup.
//!
//! Each run logs to its own file, `<Logs>/<identifier>_<timestamp>.txt`,
//! through a global `tracing-subscriber` fmt subscriber.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::filter::LevelFilter;

use crate::error::FsResult;

/// Map a configured level name to a filter.
///
/// Accepts `NOTSET`, `DEBUG`, `INFO`, `WARN`/`WARNING`, `ERROR` and
/// `CRITICAL`, case-insensitively. Anything else falls back to `DEBUG`.
pub fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_uppercase().as_str() {
        "NOTSET" => LevelFilter::TRACE,
        "DEBUG" => LevelFilter::DEBUG,
        "INFO" => LevelFilter::INFO,
        "WARN" | "WARNING" => LevelFilter::WARN,
        "ERROR" | "CRITICAL" => LevelFilter::ERROR,
        _ => LevelFilter::DEBUG,
    }
}

/// Install the global subscriber writing to `log_file`.
///
/// Returns `Ok(true)` when installed. If a global subscriber already exists
/// (a second run in the same process, or a test harness) the file is still
/// created but nothing is installed and `Ok(false)` is returned.
pub fn init(log_file: &Path, level: LevelFilter) -> FsResult<bool> {
    let file = File::create(log_file)?;
    let installed = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .try_init();

    match installed {
        Ok(()) => Ok(true),
        Err(e) => {
            warn!(log_file = %log_file.display(), error = %e, "subscriber already installed");
            Ok(false)
        }
    }
}
