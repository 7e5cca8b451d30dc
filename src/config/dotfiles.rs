//! `dotfiles.yaml`: the store marker file and sync ignore rules.
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::validation::{ConfigValidator, ValidationWarning, check_patterns};
use super::{CONFIG_FILE, MIGRATE_FILE, yaml_loader};
use crate::error::ConfigError;

/// Store-wide settings read by `sync`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotfilesConfig {
    /// Glob patterns for store entries that must never be linked into home.
    #[serde(default, deserialize_with = "yaml_loader::list_or_empty")]
    pub ignore: Vec<String>,
}

impl DotfilesConfig {
    /// The configuration written by `init`.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            ignore: vec![
                MIGRATE_FILE.to_string(),
                ".DS_Store".to_string(),
                "*.log".to_string(),
            ],
        }
    }

    /// Load `<store>/dotfiles.yaml`, falling back to [`initial`](Self::initial)
    /// when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(store: &Path) -> Result<Self, ConfigError> {
        yaml_loader::load_or(&store.join(CONFIG_FILE), Self::initial)
    }

    /// Write this configuration to `<store>/dotfiles.yaml`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if serialisation or the write fails.
    pub fn save(&self, store: &Path) -> Result<(), ConfigError> {
        yaml_loader::save(&store.join(CONFIG_FILE), self)
    }
}

impl ConfigValidator for DotfilesConfig {
    fn validate(&self) -> Vec<ValidationWarning> {
        check_patterns(CONFIG_FILE, &self.ignore)
    }
}
