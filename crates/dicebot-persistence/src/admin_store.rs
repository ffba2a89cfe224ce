//! File-backed storage for the notification admin list.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::atomic::{read_json_optional, write_json};
use crate::error::Result;

/// Stores the set of admin user ids as a JSON array (`[123, 456]`).
///
/// There is no versioning: the whole list is read once at startup and
/// rewritten on every change.
#[derive(Debug, Clone)]
pub struct AdminListStore {
    path: PathBuf,
}

impl AdminListStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the admin list. A missing file is an empty list.
    pub fn load(&self) -> Result<BTreeSet<u64>> {
        let ids: Vec<u64> = read_json_optional(&self.path)?.unwrap_or_default();
        let admins: BTreeSet<u64> = ids.into_iter().collect();
        info!(count = admins.len(), path = %self.path.display(), "Loaded admin list");
        Ok(admins)
    }

    /// Rewrites the file with the full admin list.
    pub fn save(&self, admins: &BTreeSet<u64>) -> Result<()> {
        let ids: Vec<u64> = admins.iter().copied().collect();
        write_json(&self.path, &ids)?;
        debug!(count = ids.len(), path = %self.path.display(), "Saved admin list");
        Ok(())
    }
}
