//! Symlink resource: a home path linked back to its store file.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::fs::{
    create_symlink, ensure_parent_dir, exists_no_follow, link_destination, paths_equal,
};
use super::{Resource, ResourceChange, ResourceState};

/// Reason reported when the home path is a link to somewhere else.
pub const REASON_FOREIGN_LINK: &str = "symlink exists to different location";

/// Reason reported when the home path is a real file or directory.
pub const REASON_NOT_A_LINK: &str = "file exists and is not a symlink";

/// A symlink resource that can be checked and applied.
///
/// Unlike a general-purpose link manager this never removes an existing
/// target: anything already at `target` is a conflict.
#[derive(Debug, Clone)]
pub struct SymlinkResource {
    /// The store file (what the symlink points to).
    pub source: PathBuf,
    /// The home path (where the symlink will be created).
    pub target: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    fn points_at_source(&self) -> bool {
        link_destination(&self.target).is_some_and(|dest| paths_equal(&dest, &self.source))
    }
}

impl Resource for SymlinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.target.display(), self.source.display())
    }

    fn current_state(&self) -> Result<ResourceState> {
        // Store directories (and links to directories) are walked, not linked.
        if self.source.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: "source is a directory".to_string(),
            });
        }

        let Ok(meta) = self.target.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };

        if meta.file_type().is_symlink() {
            if self.points_at_source() {
                return Ok(ResourceState::Correct);
            }
            return Ok(ResourceState::Conflict {
                reason: REASON_FOREIGN_LINK.to_string(),
            });
        }

        Ok(ResourceState::Conflict {
            reason: REASON_NOT_A_LINK.to_string(),
        })
    }

    fn apply(&self) -> Result<ResourceChange> {
        if exists_no_follow(&self.target) && self.points_at_source() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        ensure_parent_dir(&self.target)?;
        create_symlink(&self.source, &self.target)
            .with_context(|| format!("create link: {}", self.target.display()))?;
        Ok(ResourceChange::Applied { backup: None })
    }
}
