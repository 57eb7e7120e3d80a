//! Configuration schema definitions for viewcache.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::views::BatchDescriptor;

/// Root configuration structure for `.viewcache/config.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewcacheConfig {
    /// Where and how views are located
    pub views: ViewSettings,

    /// Precompilation batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<BatchDescriptor>,
}

/// View location settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// View roots, searched in order (relative to the project root)
    pub roots: Vec<PathBuf>,

    /// Template file extension, without the leading dot
    pub extension: String,

    /// Folder holding views shared across actions
    pub shared_folder: String,

    /// Folder holding layouts
    pub layouts_folder: String,

    /// Master used when no master is named and no action layout exists
    pub default_master: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from("views")],
            extension: "html".to_string(),
            shared_folder: "Shared".to_string(),
            layouts_folder: "Layouts".to_string(),
            default_master: "Application".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: ViewcacheConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.views, ViewSettings::default());
        assert!(config.batch.is_none());
    }

    #[test]
    fn partial_views_section_keeps_other_defaults() {
        let config: ViewcacheConfig = serde_yaml::from_str(
            r#"
views:
  extension: spark
  roots: [app/views, shared/views]
"#,
        )
        .unwrap();

        assert_eq!(config.views.extension, "spark");
        assert_eq!(
            config.views.roots,
            vec![PathBuf::from("app/views"), PathBuf::from("shared/views")]
        );
        assert_eq!(config.views.layouts_folder, "Layouts");
        assert_eq!(config.views.default_master, "Application");
    }

    #[test]
    fn batch_section_parses() {
        let config: ViewcacheConfig = serde_yaml::from_str(
            r#"
batch:
  entries:
    - subject: { action: home }
      layouts: [[site]]
"#,
        )
        .unwrap();

        let batch = config.batch.unwrap();
        assert_eq!(batch.entries.len(), 1);
        assert_eq!(batch.entries[0].subject.namespace, "");
        assert_eq!(batch.entries[0].layouts, vec![vec!["site".to_string()]]);
    }

    #[test]
    fn serializes_without_empty_batch() {
        let yaml = serde_yaml::to_string(&ViewcacheConfig::default()).unwrap();
        assert!(yaml.contains("extension: html"));
        assert!(!yaml.contains("batch"));
    }
}
