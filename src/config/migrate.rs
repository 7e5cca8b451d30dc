//! `migrate.yaml`: which home paths to move into the store.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::validation::{ConfigValidator, ValidationWarning, check_patterns};
use super::{MIGRATE_FILE, yaml_loader};
use crate::error::ConfigError;
use crate::ignore::IgnoreMatcher;
use crate::safety::normalize_relative;

/// Migration plan read by `migrate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateConfig {
    /// Home-relative paths (files or directories) to migrate, in order.
    #[serde(default, deserialize_with = "yaml_loader::list_or_empty")]
    pub paths: Vec<String>,
    /// Glob patterns for files that must never be migrated.
    #[serde(default, deserialize_with = "yaml_loader::list_or_empty")]
    pub ignore: Vec<String>,
}

impl MigrateConfig {
    /// The configuration written by `init`.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            paths: Vec::new(),
            ignore: vec![".DS_Store".to_string(), "*.log".to_string()],
        }
    }

    /// Load `<store>/migrate.yaml`, falling back to [`initial`](Self::initial)
    /// when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(store: &Path) -> Result<Self, ConfigError> {
        yaml_loader::load_or(&store.join(MIGRATE_FILE), Self::initial)
    }

    /// Write this configuration to `<store>/migrate.yaml`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if serialisation or the write fails.
    pub fn save(&self, store: &Path) -> Result<(), ConfigError> {
        yaml_loader::save(&store.join(MIGRATE_FILE), self)
    }
}

impl ConfigValidator for MigrateConfig {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = check_patterns(MIGRATE_FILE, &self.ignore);
        // A malformed pattern is reported as a hard error when the matcher is
        // built, so an empty matcher here only suppresses the overlap check.
        let matcher = IgnoreMatcher::new(&self.ignore).unwrap_or_default();
        let mut seen = HashSet::new();

        for spec in &self.paths {
            match normalize_relative(spec) {
                Err(e) => warnings.push(ValidationWarning::new(MIGRATE_FILE, spec, e.to_string())),
                Ok(rel) => {
                    if !seen.insert(rel.clone()) {
                        warnings.push(ValidationWarning::new(
                            MIGRATE_FILE,
                            spec,
                            "duplicate path",
                        ));
                    } else if matcher.is_ignored(&rel) {
                        warnings.push(ValidationWarning::new(
                            MIGRATE_FILE,
                            spec,
                            "path is also matched by an ignore pattern and will be skipped",
                        ));
                    }
                }
            }
        }

        warnings
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::fs;

    fn config(paths: &[&str], ignore: &[&str]) -> MigrateConfig {
        MigrateConfig {
            paths: paths.iter().map(ToString::to_string).collect(),
            ignore: ignore.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn initial_has_no_paths() {
        let c = MigrateConfig::initial();
        assert!(c.paths.is_empty());
        assert_eq!(c.ignore, vec![".DS_Store", "*.log"]);
    }

    #[test]
    fn loads_paths_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MIGRATE_FILE),
            "paths:\n  - /.vimrc\n  - /.config/nvim\nignore:\n  - '*.swp'\n",
        )
        .unwrap();
        let c = MigrateConfig::load(dir.path()).unwrap();
        assert_eq!(c.paths, vec!["/.vimrc", "/.config/nvim"]);
        assert_eq!(c.ignore, vec!["*.swp"]);
    }

    #[test]
    fn missing_ignore_key_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MIGRATE_FILE), "paths: [/.vimrc]\n").unwrap();
        assert!(MigrateConfig::load(dir.path()).unwrap().ignore.is_empty());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let c = config(&["/.vimrc"], &["*.log"]);
        c.save(dir.path()).unwrap();
        assert_eq!(MigrateConfig::load(dir.path()).unwrap(), c);
    }

    #[test]
    fn validate_flags_duplicates_after_normalising() {
        let warnings = config(&["/.vimrc", ".vimrc"], &[]).validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, ".vimrc");
        assert_eq!(warnings[0].message, "duplicate path");
    }

    #[test]
    fn validate_flags_escaping_paths() {
        let warnings = config(&["../outside"], &[]).validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("escapes the home directory"));
    }

    #[test]
    fn validate_flags_ignored_paths() {
        let warnings = config(&["/debug.log"], &["*.log"]).validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("ignore pattern"));
    }

    #[test]
    fn validate_clean_config() {
        assert!(config(&["/.vimrc", "/.config/nvim"], &["*.log"]).validate().is_empty());
    }
}
