//! Advisory lock held while a real migrate or sync mutates the store.
use anyhow::{Context as _, Result};
use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Name of the lock file at the top of the store.
pub const LOCK_FILE: &str = ".dotfiles.lock";

/// Exclusive claim on a store, released on drop.
///
/// The lock file is created atomically and holds the owner's pid. A file
/// left behind by a killed process has to be removed by hand.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    /// Create `<store>/.dotfiles.lock`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Locked`] if the file already exists, or an I/O
    /// error if it cannot be created.
    pub fn acquire(store: &Path) -> Result<Self> {
        let path = store.join(LOCK_FILE);
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::Locked { path }.into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("creating lock file {}", path.display()));
            }
        };
        // Claim the path before writing so a failed write still cleans up.
        let lock = Self { path };
        writeln!(file, "{}", std::process::id())
            .with_context(|| format!("writing lock file {}", lock.path.display()))?;
        Ok(lock)
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
