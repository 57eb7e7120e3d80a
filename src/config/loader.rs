//! Configuration file discovery and loading.
//!
//! This module handles finding and loading configuration files from
//! a project root in the correct priority order.

use crate::config::merger::merge_configs;
use crate::config::schema::ViewcacheConfig;
use crate::error::{Result, ViewError};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".viewcache";

/// Paths to configuration files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. Project config (`.viewcache/config.yml`)
/// 2. Local overrides (`.viewcache/config.local.yml`)
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .viewcache/config.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .viewcache/config.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(project_root.join(CONFIG_DIR).join("config.yml")),
            project_local: existing(project_root.join(CONFIG_DIR).join("config.local.yml")),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project
            .iter()
            .chain(self.project_local.iter())
            .collect()
    }

    /// Check if any project config exists.
    pub fn has_project_config(&self) -> bool {
        self.project.is_some()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Find the project root by walking up from `start`.
///
/// Looks for:
/// 1. `.viewcache` directory (primary indicator)
/// 2. `.git` directory (fallback)
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(CONFIG_DIR).is_dir() {
            return Some(current);
        }

        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a single config file and parse it into [`ViewcacheConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ViewcacheConfig> {
    let content = read(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into [`ViewcacheConfig`].
pub fn parse_config(content: &str, source_path: &Path) -> Result<ViewcacheConfig> {
    serde_yaml::from_str(content).map_err(|e| ViewError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a config file as a raw YAML value (for merging).
pub fn load_config_value(path: &Path) -> Result<Value> {
    let content = read(path)?;
    serde_yaml::from_str(&content).map_err(|e| ViewError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ViewError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ViewError::Io(e)
        }
    })
}

/// Load and merge all config files for a project.
///
/// A project without any config file gets the defaults. Empty files are
/// skipped; a file whose top level is not a mapping is skipped with a
/// warning.
///
/// # Errors
///
/// Returns `ConfigParseError` if any config file is invalid.
pub fn load_merged_config(project_root: &Path) -> Result<ViewcacheConfig> {
    let paths = ConfigPaths::discover(project_root);

    if paths.all_existing().is_empty() {
        debug!("No configuration under {}, using defaults", project_root.display());
        return Ok(ViewcacheConfig::default());
    }

    let mut configs = Vec::new();
    for path in paths.all_existing() {
        match load_config_value(path)? {
            Value::Null => debug!("Skipping empty config {}", path.display()),
            value @ Value::Mapping(_) => configs.push(value),
            _ => warn!("Ignoring config {}: top level is not a mapping", path.display()),
        }
    }

    let merged = merge_configs(&configs);

    serde_yaml::from_value(merged).map_err(|e| ViewError::ConfigParseError {
        path: project_root.join(CONFIG_DIR).join("config.yml"),
        message: format!("Failed to parse merged config: {}", e),
    })
}

/// Load config with optional path override.
///
/// If `config_override` is provided, loads only that file without merging.
/// Otherwise, discovers and merges all config files.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<ViewcacheConfig> {
    if let Some(override_path) = config_override {
        load_config_file(override_path)
    } else {
        load_merged_config(project_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(CONFIG_DIR);
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
        temp
    }

    #[test]
    fn discover_finds_project_and_local_config() {
        let temp = project(&[("config.yml", ""), ("config.local.yml", "")]);

        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.has_project_config());
        assert!(paths.project_local.is_some());
        assert_eq!(
            paths.all_existing(),
            vec![
                &temp.path().join(CONFIG_DIR).join("config.yml"),
                &temp.path().join(CONFIG_DIR).join("config.local.yml"),
            ]
        );
    }

    #[test]
    fn discover_returns_none_for_missing_configs() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::discover(temp.path());
        assert!(paths.project.is_none());
        assert!(paths.project_local.is_none());
        assert!(paths.all_existing().is_empty());
    }

    #[test]
    fn find_project_root_finds_config_dir() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("views").join("home");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(CONFIG_DIR)).unwrap();

        assert_eq!(find_project_root(&subdir), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_prefers_config_dir_over_git() {
        let temp = TempDir::new().unwrap();
        let subdir = temp.path().join("nested").join("site");
        fs::create_dir_all(&subdir).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::create_dir_all(subdir.join(CONFIG_DIR)).unwrap();

        assert_eq!(find_project_root(&subdir), Some(subdir));
    }

    #[test]
    fn load_config_file_returns_not_found_error() {
        let result = load_config_file(Path::new("/nonexistent/config.yml"));
        assert!(matches!(result, Err(ViewError::ConfigNotFound { .. })));
    }

    #[test]
    fn parse_config_returns_parse_error_for_invalid_yaml() {
        let result = parse_config("views: [unclosed", Path::new("test.yml"));
        assert!(matches!(result, Err(ViewError::ConfigParseError { .. })));
    }

    #[test]
    fn load_merged_config_defaults_without_files() {
        let temp = TempDir::new().unwrap();
        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.views.extension, "html");
        assert!(config.batch.is_none());
    }

    #[test]
    fn load_merged_config_applies_local_overrides() {
        let temp = project(&[
            (
                "config.yml",
                "views:\n  extension: spark\n  default_master: Site\n",
            ),
            ("config.local.yml", "views:\n  default_master: Debug\n"),
        ]);

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.views.extension, "spark");
        assert_eq!(config.views.default_master, "Debug");
    }

    #[test]
    fn load_merged_config_skips_empty_files() {
        let temp = project(&[
            ("config.yml", "views:\n  extension: spark\n"),
            ("config.local.yml", ""),
        ]);

        let config = load_merged_config(temp.path()).unwrap();
        assert_eq!(config.views.extension, "spark");
    }

    #[test]
    fn load_merged_config_reports_invalid_layer() {
        let temp = project(&[("config.yml", "views: [unclosed")]);
        let result = load_merged_config(temp.path());
        assert!(matches!(result, Err(ViewError::ConfigParseError { .. })));
    }

    #[test]
    fn load_config_with_override_skips_merge() {
        let temp = project(&[("config.yml", "views:\n  extension: spark\n")]);
        let override_path = temp.path().join("custom.yml");
        fs::write(&override_path, "views:\n  shared_folder: Common\n").unwrap();

        let config = load_config(temp.path(), Some(&override_path)).unwrap();
        assert_eq!(config.views.shared_folder, "Common");
        assert_eq!(config.views.extension, "html");
    }
}
