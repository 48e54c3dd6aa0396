use std::fmt::Display;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::config::FileSystemConfig;
use crate::error::{FsError, FsResult};
use crate::filesystem::FileSystem;
use crate::logging;

/// Run `work` inside a started [`FileSystem`].
///
/// The filesystem is built from `config` and started, logging is installed
/// to a fresh file under `Logs` named after `identifier`, and then `work`
/// runs. Once started, the filesystem is stopped on every exit path
/// (success, error, early return or panic), so every metadata fact
/// recorded is persisted. An error from `work` takes precedence over an
/// error from stopping.
pub fn run<T, E, F>(config: &FileSystemConfig, identifier: &str, work: F) -> Result<T, E>
where
    F: FnOnce(&mut FileSystem) -> Result<T, E>,
    E: From<FsError> + Display,
{
    let mut file_system = FileSystem::new(config)?;
    let mut started = Started::begin(&mut file_system)?;

    let log_file = started.file_system.log_resource(identifier)?;
    logging::init(&log_file, logging::parse_level(&config.log_level))?;
    info!(identifier, log_file = %log_file.display(), "application started");

    let clock = Instant::now();
    let outcome = work(&mut *started.file_system);
    if let Err(e) = &outcome {
        warn!(identifier, error = %e, "application failed");
    }

    let stopped = started.finish();
    info!(
        identifier,
        elapsed_ms = clock.elapsed().as_millis() as u64,
        "application stopped"
    );

    let value = outcome?;
    stopped?;
    Ok(value)
}

/// A started filesystem that is stopped when finished or dropped.
struct Started<'a> {
    file_system: &'a mut FileSystem,
    finished: bool,
}

impl<'a> Started<'a> {
    fn begin(file_system: &'a mut FileSystem) -> FsResult<Self> {
        file_system.start()?;
        Ok(Self {
            file_system,
            finished: false,
        })
    }

    fn finish(mut self) -> FsResult<()> {
        self.finished = true;
        self.file_system.stop()
    }
}

impl Drop for Started<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.file_system.stop() {
            error!(
                info_home = %self.file_system.info_home().display(),
                error = %e,
                "failed to stop filesystem on drop"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum AppError {
        Fs(FsError),
        Rejected,
    }

    impl From<FsError> for AppError {
        fn from(e: FsError) -> Self {
            Self::Fs(e)
        }
    }

    impl Display for AppError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Fs(e) => write!(f, "{e}"),
                Self::Rejected => f.write_str("rejected"),
            }
        }
    }

    fn config(dir: &tempfile::TempDir) -> FileSystemConfig {
        FileSystemConfig::with_homes(dir.path().join("info"), dir.path().join("software"))
    }

    #[test]
    fn returns_work_result_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let allocated = run(&config(&dir), "crawler", |fs| -> Result<u32, FsError> {
            let store = fs.tree_store("pages")?;
            store.allocate_sample_home()?;
            fs.metadata_mut()
                .add_item("pages", "kind", [("store".to_string(), "tree".to_string())].into());
            Ok(store.index())
        })
        .unwrap();
        assert_eq!(allocated, 1);

        let fs = FileSystem::new(&config(&dir)).unwrap();
        assert!(fs.metadata().get("pages", "kind").is_some());
        let logs: Vec<_> = std::fs::read_dir(fs.logs()).unwrap().collect();
        assert_eq!(logs.len(), 1);
    }

    #[test]
    fn panicking_work_still_stops() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            run(&config, "crawler", |fs| -> Result<(), FsError> {
                fs.metadata_mut()
                    .add_item("run", "status", [("state".to_string(), "crashed".to_string())].into());
                panic!("work blew up");
            })
        }));
        assert!(result.is_err());

        let fs = FileSystem::new(&config).unwrap();
        assert_eq!(fs.metadata().get("run", "status").unwrap()["state"], "crashed");
    }

    #[test]
    fn dropped_guard_stops_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let mut file_system = FileSystem::new(&config(&dir)).unwrap();
        {
            let mut started = Started::begin(&mut file_system).unwrap();
            started.file_system.metadata_mut().add_item(
                "run",
                "status",
                [("state".to_string(), "aborted".to_string())].into(),
            );
            // Leaves scope without `finish`, as an early `?` return would.
        }

        let reopened = FileSystem::new(&config(&dir)).unwrap();
        assert_eq!(reopened.metadata().get("run", "status").unwrap()["state"], "aborted");
    }

    #[test]
    fn failed_work_still_stops() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<(), AppError> = run(&config(&dir), "crawler", |fs| {
            fs.metadata_mut()
                .add_item("run", "status", [("state".to_string(), "partial".to_string())].into());
            Err(AppError::Rejected)
        });
        assert!(matches!(result, Err(AppError::Rejected)));

        let fs = FileSystem::new(&config(&dir)).unwrap();
        assert!(fs.metadata().get("run", "status").is_some());
    }
}
