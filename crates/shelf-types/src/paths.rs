//! Directory helpers shared by every store.
//!
//! All directories are created owner-only (`0o700`) on unix. Creation is
//! idempotent: resolving an existing directory simply returns its path.

use std::fs::{self, DirBuilder};
use std::io;
use std::path::{Path, PathBuf};

/// Ensure `base` exists as a directory and return its path.
///
/// A leading `~` is expanded to `$HOME`. Missing parents are created.
pub fn ensure_directory(base: &Path) -> io::Result<PathBuf> {
    let directory = expand_home(base);
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(&directory)?;
    Ok(directory)
}

/// Ensure `<base>/<identifier>` exists and return it.
pub fn get_container(base: &Path, identifier: &str) -> io::Result<PathBuf> {
    ensure_directory(&base.join(identifier))
}

/// Path of `<base>/<name><suffix>`, creating `base` if needed.
///
/// `suffix` includes the dot, e.g. `".json"`. The resource file itself is
/// not created.
pub fn get_resource(base: &Path, name: &str, suffix: &str) -> io::Result<PathBuf> {
    let directory = ensure_directory(base)?;
    Ok(directory.join(format!("{name}{suffix}")))
}

/// Remove a directory tree. A missing directory is not an error.
pub fn remove_directory(base: &Path) -> io::Result<()> {
    match fs::remove_dir_all(base) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
