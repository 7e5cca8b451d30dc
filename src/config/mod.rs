//! Store configuration files.
//!
//! Both files live at the top of the store and are plain YAML:
//!
//! - `dotfiles.yaml` marks the store as initialised and lists sync ignores
//! - `migrate.yaml` lists the home paths to migrate and migrate ignores
pub mod dotfiles;
pub mod migrate;
pub mod validation;
pub mod yaml_loader;

pub use dotfiles::DotfilesConfig;
pub use migrate::MigrateConfig;
pub use validation::{ConfigValidator, ValidationWarning};

/// Name of the store marker and sync config file.
pub const CONFIG_FILE: &str = "dotfiles.yaml";

/// Name of the migration plan file.
pub const MIGRATE_FILE: &str = "migrate.yaml";
