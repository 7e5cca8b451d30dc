//! Path safety checks: critical-file classification, the system-directory
//! deny-list, timestamped backups and home-relative path normalisation.
use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::error::SafetyError;

/// Files whose loss would break a login shell, SSH access or git identity.
///
/// Entries are home-relative. Matching is by base name or exact path, so
/// `.ssh/config` also flags any file called `config`.
pub const CRITICAL_FILES: &[&str] = &[
    ".bashrc",
    ".bash_profile",
    ".zshrc",
    ".zprofile",
    ".profile",
    ".bash_history",
    ".zsh_history",
    ".ssh/config",
    ".ssh/authorized_keys",
    ".ssh/id_rsa",
    ".ssh/id_ed25519",
    ".gitconfig",
];

/// Root-level directories that are never touched.
const SYSTEM_DIRECTORIES: &[&str] = &["/", "/root", "/etc"];

/// Return `true` when `path` names a critical file.
///
/// Only affects warnings and backups; a critical file is never refused.
#[must_use]
pub fn is_critical_file(path: &Path) -> bool {
    let base = path.file_name();
    CRITICAL_FILES.iter().any(|entry| {
        let entry = Path::new(entry);
        path == entry || (base.is_some() && base == entry.file_name())
    })
}

/// Refuse root-level system directories.
///
/// # Errors
///
/// Returns [`SafetyError::SystemDirectory`] when `path` is `/`, `/root` or
/// `/etc`.
pub fn check_path_safety(path: &Path) -> Result<(), SafetyError> {
    if path.is_absolute() && SYSTEM_DIRECTORIES.iter().any(|d| path == Path::new(d)) {
        return Err(SafetyError::SystemDirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Copy `path` to a timestamped sibling and return the backup's path.
///
/// The backup is named `<name>.backup_<YYYYMMDD_HHMMSS>` using local time.
/// When that name is taken a numeric suffix is appended. Content and
/// permission bits are preserved; the original is left in place.
///
/// # Errors
///
/// Returns an error if `path` is a directory, cannot be read, or the copy
/// fails.
pub fn backup_file(path: &Path) -> Result<PathBuf> {
    let meta =
        fs::metadata(path).with_context(|| format!("reading {} for backup", path.display()))?;
    if meta.is_dir() {
        return Err(SafetyError::BackupOfDirectory {
            path: path.to_path_buf(),
        }
        .into());
    }

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let base = format!("{}.backup_{stamp}", path.display());
    let mut backup = PathBuf::from(&base);
    let mut n = 0u32;
    while backup.symlink_metadata().is_ok() {
        n += 1;
        backup = PathBuf::from(format!("{base}_{n}"));
    }

    fs::copy(path, &backup).with_context(|| {
        format!(
            "backing up {} to {}",
            path.display(),
            backup.display()
        )
    })?;
    Ok(backup)
}

/// Turn a declared path spec into a clean home-relative path.
///
/// Leading separators and `.` components are dropped, so `"/.vimrc"` and
/// `".vimrc"` both yield `.vimrc`.
///
/// # Errors
///
/// Returns [`SafetyError::EscapesHome`] if the spec contains `..`, or
/// [`SafetyError::HomeDirectory`] if nothing remains after cleaning.
pub fn normalize_relative(spec: &str) -> Result<PathBuf, SafetyError> {
    let mut out = PathBuf::new();
    for component in Path::new(spec).components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                return Err(SafetyError::EscapesHome {
                    spec: spec.to_string(),
                });
            }
            Component::Normal(part) => out.push(part),
        }
    }
    if out.as_os_str().is_empty() {
        return Err(SafetyError::HomeDirectory {
            spec: spec.to_string(),
        });
    }
    Ok(out)
}

/// Render a relative path with `/` separators on every platform.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
