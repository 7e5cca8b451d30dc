//! Relocate resource: a home file moved into the store.
use anyhow::{Context as _, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::helpers::fs::{ensure_parent_dir, exists_no_follow, link_destination, paths_equal};
use super::{Resource, ResourceChange, ResourceState};
use crate::safety::{backup_file, check_path_safety, is_critical_file};

/// Reason reported for directories handed to a single-file move.
pub const REASON_DIRECTORY: &str = "can't migrate a directory";

/// Reason reported when the home path is a link that does not point into the store.
pub const REASON_SOURCE_LINK: &str = "source is a symlink";

/// Reason reported when the store already has something at the destination.
pub const REASON_TARGET_EXISTS: &str = "already exists in dotfiles";

/// A file in home that should live at `target` in the store.
#[derive(Debug, Clone)]
pub struct RelocateResource {
    /// Current location of the file in home.
    pub source: PathBuf,
    /// Destination inside the store.
    pub target: PathBuf,
}

impl RelocateResource {
    /// Create a new relocate resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Whether the source is on the critical-file list.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        is_critical_file(&self.source)
    }
}

impl Resource for RelocateResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.source.display(), self.target.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        check_path_safety(&self.source)?;

        let meta = match self.source.symlink_metadata() {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(ResourceState::Invalid {
                    reason: "does not exist".to_string(),
                });
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to stat {}", self.source.display()));
            }
        };

        if meta.is_dir() {
            return Ok(ResourceState::Conflict {
                reason: REASON_DIRECTORY.to_string(),
            });
        }

        if meta.file_type().is_symlink() {
            // A link into the store is what a previous migrate + sync leaves behind.
            if link_destination(&self.source).is_some_and(|dest| paths_equal(&dest, &self.target)) {
                return Ok(ResourceState::Correct);
            }
            return Ok(ResourceState::Conflict {
                reason: REASON_SOURCE_LINK.to_string(),
            });
        }

        if exists_no_follow(&self.target) {
            return Ok(ResourceState::Conflict {
                reason: REASON_TARGET_EXISTS.to_string(),
            });
        }

        Ok(ResourceState::Missing)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let backup = if self.is_critical() {
            Some(
                backup_file(&self.source)
                    .with_context(|| format!("backup before move: {}", self.source.display()))?,
            )
        } else {
            None
        };

        ensure_parent_dir(&self.target)?;
        fs::rename(&self.source, &self.target).with_context(|| {
            format!(
                "moving {} to {}",
                self.source.display(),
                self.target.display()
            )
        })?;

        Ok(ResourceChange::Applied { backup })
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::path::Path;

    struct Fixture {
        _dir: tempfile::TempDir,
        home: PathBuf,
        store: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        let store = home.join(".dotfiles");
        fs::create_dir_all(&store).unwrap();
        Fixture {
            _dir: dir,
            home,
            store,
        }
    }

    fn resource(f: &Fixture, rel: &str) -> RelocateResource {
        RelocateResource::new(f.home.join(rel), f.store.join(rel))
    }

    #[test]
    fn regular_file_is_missing_from_store() {
        let f = fixture();
        fs::write(f.home.join(".vimrc"), "set nu").unwrap();
        assert_eq!(
            resource(&f, ".vimrc").current_state().unwrap(),
            ResourceState::Missing
        );
    }

    #[test]
    fn apply_moves_file_and_creates_parents() {
        let f = fixture();
        fs::create_dir_all(f.home.join(".config/nvim")).unwrap();
        fs::write(f.home.join(".config/nvim/init.lua"), "-- init").unwrap();
        let r = resource(&f, ".config/nvim/init.lua");

        assert_eq!(
            r.apply().unwrap(),
            ResourceChange::Applied { backup: None }
        );
        assert!(!exists_no_follow(&r.source));
        assert_eq!(fs::read_to_string(&r.target).unwrap(), "-- init");
    }

    #[test]
    fn critical_file_is_backed_up_before_move() {
        let f = fixture();
        fs::write(f.home.join(".zshrc"), "export A=1\n").unwrap();
        let r = resource(&f, ".zshrc");

        let ResourceChange::Applied { backup: Some(backup) } = r.apply().unwrap() else {
            panic!("expected a backup for a critical file");
        };
        assert_eq!(backup.parent(), Some(f.home.as_path()));
        assert_eq!(fs::read_to_string(&backup).unwrap(), "export A=1\n");
        assert_eq!(fs::read_to_string(&r.target).unwrap(), "export A=1\n");
    }

    #[test]
    fn missing_source_is_invalid() {
        let f = fixture();
        assert_eq!(
            resource(&f, ".nope").current_state().unwrap(),
            ResourceState::Invalid {
                reason: "does not exist".to_string()
            }
        );
    }

    #[test]
    fn directory_source_is_conflict() {
        let f = fixture();
        fs::create_dir_all(f.home.join(".config")).unwrap();
        assert_eq!(
            resource(&f, ".config").current_state().unwrap(),
            ResourceState::Conflict {
                reason: REASON_DIRECTORY.to_string()
            }
        );
    }

    #[test]
    fn existing_target_is_conflict_and_untouched() {
        let f = fixture();
        fs::write(f.home.join(".vimrc"), "home").unwrap();
        fs::write(f.store.join(".vimrc"), "store").unwrap();
        assert_eq!(
            resource(&f, ".vimrc").current_state().unwrap(),
            ResourceState::Conflict {
                reason: REASON_TARGET_EXISTS.to_string()
            }
        );
        assert_eq!(fs::read_to_string(f.home.join(".vimrc")).unwrap(), "home");
        assert_eq!(fs::read_to_string(f.store.join(".vimrc")).unwrap(), "store");
    }

    #[cfg(unix)]
    #[test]
    fn link_into_store_is_correct() {
        let f = fixture();
        fs::write(f.store.join(".vimrc"), "store").unwrap();
        std::os::unix::fs::symlink(f.store.join(".vimrc"), f.home.join(".vimrc")).unwrap();
        assert_eq!(
            resource(&f, ".vimrc").current_state().unwrap(),
            ResourceState::Correct
        );
    }

    #[cfg(unix)]
    #[test]
    fn link_elsewhere_is_conflict() {
        let f = fixture();
        fs::write(f.home.join("elsewhere"), "").unwrap();
        std::os::unix::fs::symlink(f.home.join("elsewhere"), f.home.join(".vimrc")).unwrap();
        assert_eq!(
            resource(&f, ".vimrc").current_state().unwrap(),
            ResourceState::Conflict {
                reason: REASON_SOURCE_LINK.to_string()
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn dangling_target_link_is_conflict() {
        let f = fixture();
        fs::write(f.home.join(".vimrc"), "home").unwrap();
        std::os::unix::fs::symlink(f.home.join("gone"), f.store.join(".vimrc")).unwrap();
        assert_eq!(
            resource(&f, ".vimrc").current_state().unwrap(),
            ResourceState::Conflict {
                reason: REASON_TARGET_EXISTS.to_string()
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn stat_failure_is_an_error() {
        let f = fixture();
        std::os::unix::fs::symlink(f.home.join("loop"), f.home.join("loop")).unwrap();
        let err = resource(&f, "loop/conf").current_state().unwrap_err();
        assert!(err.to_string().starts_with("failed to stat "));
    }

    #[test]
    fn system_directory_is_an_error() {
        let r = RelocateResource::new(PathBuf::from("/etc"), PathBuf::from("/tmp/x"));
        let err = r.current_state().unwrap_err();
        assert!(err.to_string().contains("system directory"));
    }

    #[test]
    fn description_shows_move_direction() {
        let r = RelocateResource::new(
            Path::new("/h/.vimrc").to_path_buf(),
            Path::new("/h/.dotfiles/.vimrc").to_path_buf(),
        );
        assert_eq!(r.description(), "/h/.vimrc -> /h/.dotfiles/.vimrc");
    }
}
