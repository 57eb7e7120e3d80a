//! Configuration loading, parsing, and validation for viewcache.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use viewcache::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let config_dir = temp.path().join(".viewcache");
//! fs::create_dir_all(&config_dir).unwrap();
//! fs::write(config_dir.join("config.yml"), "views:\n  extension: spark\n").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.views.extension, "spark");
//! ```
//!
//! # Configuration File Locations
//!
//! Configuration is discovered and merged in this order:
//! 1. Project config (`.viewcache/config.yml`)
//! 2. Local overrides (`.viewcache/config.local.yml`)
//!
//! Without either file the defaults apply.

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use schema::{ViewSettings, ViewcacheConfig};

pub use loader::{
    find_project_root, load_config, load_config_file, load_config_value, load_merged_config,
    parse_config, ConfigPaths, CONFIG_DIR,
};

pub use merger::{deep_merge, merge_configs};

pub use validator::{batch_errors, validate, validate_batch, validate_config, ValidationError};
