//! Domain-specific error types for the dotfiles engine.
//!
//! Library modules return typed errors from this module while command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via the
//! standard `?` operator.
//!
//! - [`ConfigError`]: YAML parsing and glob patterns
//! - [`StoreError`]: init and precondition failures
//! - [`SafetyError`]: refused paths and backups
//! - [`ConflictError`]: a single file that cannot be moved or linked
//! - [`RunError`]: the aggregate produced at the end of a walk

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::safety::is_critical_file;

/// Errors that arise from loading, validating or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The YAML file could not be parsed.
    #[error("Invalid YAML in {path}: {source}")]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying parser error.
        source: serde_yaml::Error,
    },

    /// The configuration could not be serialised.
    #[error("Failed to serialise {path}: {source}")]
    Serialize {
        /// Path the configuration was going to be written to.
        path: PathBuf,
        /// Underlying serialiser error.
        source: serde_yaml::Error,
    },

    /// An I/O error occurred while reading or writing a config file.
    #[error("IO error on config file {path}: {source}")]
    Io {
        /// Path to the file that could not be accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An ignore pattern is not valid glob syntax.
    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as written in the config file.
        pattern: String,
        /// Underlying glob error.
        source: glob::PatternError,
    },
}

/// Errors that arise from the state of the managed store itself.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store has not been initialised yet.
    #[error("dotfiles not initialised in {} (run 'dotfiles init' first)", .dir.display())]
    NotInitialised {
        /// Store directory that was checked.
        dir: PathBuf,
    },

    /// `init` was called on a store that already has a marker config.
    #[error("dotfiles already initialised in {}", .dir.display())]
    AlreadyInitialised {
        /// Store directory that was checked.
        dir: PathBuf,
    },

    /// The store path exists but is a file.
    #[error(
        "safety check failed: {} exists but is not a directory. Please remove it first",
        .dir.display()
    )]
    NotADirectory {
        /// Store path that was checked.
        dir: PathBuf,
    },

    /// The store path is a directory that already has content.
    #[error(
        "safety check failed: {} already exists and contains {count} item(s). \
         If you want to reinitialise, remove it first or make sure it is empty",
        .dir.display()
    )]
    NotEmpty {
        /// Store path that was checked.
        dir: PathBuf,
        /// Number of entries found.
        count: usize,
    },

    /// The home directory could not be determined.
    #[error("cannot determine home directory. Use --home or set DOTFILES_HOME")]
    HomeNotFound,

    /// Another invocation holds the store lock.
    #[error(
        "another dotfiles command is running against this store (lock file {}). \
         If no other command is running, remove the lock file",
        .path.display()
    )]
    Locked {
        /// Path of the lock file.
        path: PathBuf,
    },
}

/// Errors raised by path safety checks.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SafetyError {
    /// The path is a root-level system directory.
    #[error("safety check failed: path {} appears to be a system directory", .path.display())]
    SystemDirectory {
        /// The refused path.
        path: PathBuf,
    },

    /// A declared path climbs out of the home directory.
    #[error("safety check failed: '{spec}' escapes the home directory")]
    EscapesHome {
        /// The declared path spec.
        spec: String,
    },

    /// A declared path resolves to the home directory itself.
    #[error("safety check failed: '{spec}' refers to the home directory itself")]
    HomeDirectory {
        /// The declared path spec.
        spec: String,
    },

    /// A declared path resolves into the store.
    #[error("safety check failed: {} is inside the dotfiles store", .path.display())]
    InsideStore {
        /// The refused path.
        path: PathBuf,
    },

    /// A backup was requested for a directory.
    #[error("cannot back up directory: {}", .path.display())]
    BackupOfDirectory {
        /// The refused path.
        path: PathBuf,
    },
}

/// The operation a conflict was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Moving a file from home into the store.
    Migrate,
    /// Linking a store file into home.
    Link,
}

/// A single file that cannot be migrated or linked without overwriting
/// something.
///
/// The rendered message names both paths and the reason, followed by
/// remediation suggestions that depend on whether the home-side file is
/// critical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictError {
    /// Which operation hit the conflict.
    pub kind: ConflictKind,
    /// Store-side or home-side source, depending on `kind`.
    pub source: PathBuf,
    /// Destination of the operation.
    pub target: PathBuf,
    /// Short reason, e.g. `"already exists in dotfiles"`.
    pub reason: String,
}

impl ConflictError {
    /// Conflict while migrating `source` (in home) to `target` (in the store).
    #[must_use]
    pub fn migrate(source: &Path, target: &Path, reason: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::Migrate,
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Conflict while linking `target` (in home) to `source` (in the store).
    #[must_use]
    pub fn link(source: &Path, target: &Path, reason: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::Link,
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// The file on the home side of the operation.
    #[must_use]
    pub fn home_side(&self) -> &Path {
        match self.kind {
            ConflictKind::Migrate => &self.source,
            ConflictKind::Link => &self.target,
        }
    }

    /// Whether the home-side file is on the critical list.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        is_critical_file(self.home_side())
    }

    /// One-line description without suggestions.
    #[must_use]
    pub fn headline(&self) -> String {
        match self.kind {
            ConflictKind::Migrate => format!(
                "failed to migrate {} -> {}: {}",
                self.source.display(),
                self.target.display(),
                self.reason
            ),
            ConflictKind::Link => format!(
                "failed to link {} -> {}: {}",
                self.target.display(),
                self.source.display(),
                self.reason
            ),
        }
    }

    fn suggestions(&self) -> [&'static str; 3] {
        match (self.kind, self.is_critical()) {
            (ConflictKind::Migrate, true) => [
                "Ensure you have a backup of this file",
                "Review the file contents before migration",
                "Use '--dry-run' first to preview changes",
            ],
            (ConflictKind::Migrate, false) => [
                "Check if the file should be migrated",
                "Remove or rename conflicting files if safe",
                "Use '--dry-run' first to preview changes",
            ],
            (ConflictKind::Link, true) => [
                "Backup the file manually before proceeding",
                "Review the file contents to ensure nothing important will be lost",
                "Consider using '--dry-run' first to preview changes",
            ],
            (ConflictKind::Link, false) => [
                "Backup or rename the existing file",
                "Remove the file if it's safe to do so",
                "Use '--dry-run' first to preview changes",
            ],
        }
    }
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        writeln!(f)?;
        if self.is_critical() {
            writeln!(
                f,
                "   SAFETY: {} is a critical system file.",
                self.home_side().display()
            )?;
        }
        write!(f, "   Suggestions:")?;
        for (i, suggestion) in self.suggestions().iter().enumerate() {
            write!(f, "\n   {}. {suggestion}", i + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConflictError {}

/// Aggregate failure of a migrate or sync run.
#[derive(Error, Debug)]
pub enum RunError {
    /// The run finished but recorded at least one error.
    #[error("{operation} finished with {} error(s):\n{}", .errors.len(), .errors.join("\n"))]
    Failed {
        /// Name of the run, e.g. `"migration"`.
        operation: &'static str,
        /// Every recorded error message, in processing order.
        errors: Vec<String>,
    },
}
