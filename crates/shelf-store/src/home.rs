use std::path::{Path, PathBuf};

use shelf_types::get_container;

use crate::error::StoreResult;
use crate::traits::Store;

/// Name of the subdirectory holding a store's sample homes.
pub(crate) const SAMPLES_DIR: &str = "samples";

/// The named home directory of a store under its parent container.
///
/// Resolving a home creates `<container>/<identifier>` if it is missing, so
/// a store always starts from an existing directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreHome {
    home: PathBuf,
}

impl StoreHome {
    /// Resolve (creating if absent) `<container>/<identifier>`.
    pub fn resolve(container: &Path, identifier: &str) -> StoreResult<Self> {
        let home = get_container(container, identifier)?;
        Ok(Self { home })
    }

    /// The home directory.
    pub fn path(&self) -> &Path {
        &self.home
    }

    /// Resolve (creating if absent) the `samples` directory under this home.
    pub(crate) fn samples(&self) -> StoreResult<PathBuf> {
        Ok(get_container(&self.home, SAMPLES_DIR)?)
    }
}

impl Store for StoreHome {
    fn kind(&self) -> &'static str {
        "Store"
    }

    fn home(&self) -> &Path {
        &self.home
    }
}
