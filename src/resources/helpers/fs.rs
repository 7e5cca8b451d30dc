//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// This is a shared helper for resource `apply()` methods that need to
/// create parent directories before moving a file or creating a symlink.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Return `true` if something exists at `path` without following symlinks,
/// so a dangling link counts as present.
#[must_use]
pub fn exists_no_follow(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Return the destination of the symlink at `link`, or `None` when `link`
/// is not a symlink.
///
/// A relative destination is resolved against the link's parent directory.
#[must_use]
pub fn link_destination(link: &Path) -> Option<PathBuf> {
    let dest = fs::read_link(link).ok()?;
    if dest.is_relative()
        && let Some(parent) = link.parent()
    {
        return Some(parent.join(dest));
    }
    Some(dest)
}

/// Compare two paths for equality, handling UNC prefix normalization on Windows.
#[must_use]
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    dunce::simplified(a) == dunce::simplified(b)
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns an error if the platform refuses to create the link.
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link).with_context(|| {
            format!(
                "creating symlink {} -> {}",
                link.display(),
                target.display()
            )
        })?;
    }

    #[cfg(windows)]
    {
        let result = if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };
        result.with_context(|| {
            format!(
                "creating symlink {} -> {} (requires developer mode or admin)",
                link.display(),
                target.display()
            )
        })?;
    }

    Ok(())
}
