//! YAML configuration file loading and saving.
use serde::de::DeserializeOwned;
use serde::{Deserialize as _, Deserializer, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Load a YAML config file.
///
/// A missing file yields `default()`. A file that is empty or only
/// whitespace and comments yields `T::default()`, i.e. empty lists.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, or
/// [`ConfigError::Parse`] if it is not valid YAML for `T`.
pub fn load_or<T: DeserializeOwned + Default>(
    path: &Path,
    default: impl FnOnce() -> T,
) -> Result<T, ConfigError> {
    if !path.exists() {
        return Ok(default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_blank(&content) {
        return Ok(T::default());
    }

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialise `value` as YAML and write it to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] or [`ConfigError::Io`].
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let content = serde_yaml::to_string(value).map_err(|source| ConfigError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Deserialise a list field, treating an explicit `null` (`ignore:` with no
/// value) as an empty list.
///
/// # Errors
///
/// Propagates the deserialiser's error for anything that is neither a
/// sequence of strings nor null.
pub fn list_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_blank(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}
