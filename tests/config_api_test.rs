//! Integration tests for config module public API.

use std::fs;
use tempfile::TempDir;
use viewcache::config::{load_config, load_merged_config, validate, ViewSettings, ViewcacheConfig};
use viewcache::views::ViewFactory;
use viewcache::ViewError;

fn setup_project(config: &str, local: Option<&str>) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".viewcache");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yml"), config).unwrap();
    if let Some(local) = local {
        fs::write(dir.join("config.local.yml"), local).unwrap();
    }
    temp
}

#[test]
fn public_api_is_accessible() {
    let config = ViewcacheConfig::default();
    assert_eq!(config.views, ViewSettings::default());
}

#[test]
fn full_config_drives_factory() {
    let temp = setup_project(
        r#"
views:
  roots: [templates]
  extension: spark
  layouts_folder: Masters
batch:
  output: site-views
  entries:
    - subject: { action: home }
      layouts: [[site]]
"#,
        None,
    );
    fs::create_dir_all(temp.path().join("templates/home")).unwrap();
    fs::create_dir_all(temp.path().join("templates/Masters")).unwrap();
    fs::write(temp.path().join("templates/home/index.spark"), "<index/>").unwrap();
    fs::write(temp.path().join("templates/Masters/site.spark"), "<site/>").unwrap();

    let config = load_merged_config(temp.path()).unwrap();
    validate(&config).unwrap();

    let factory = ViewFactory::from_settings(temp.path(), &config.views);
    let descriptors = factory.precompile(config.batch.as_ref().unwrap()).unwrap();

    assert_eq!(descriptors.len(), 1);
    assert_eq!(
        descriptors[0].templates(),
        ["home/index.spark", "Masters/site.spark"]
    );
}

#[test]
fn config_merge_workflow() {
    let temp = setup_project(
        "views:\n  roots: [views, vendor/views]\n  default_master: Site\n",
        Some("views:\n  roots: [local]\n"),
    );

    let config = load_merged_config(temp.path()).unwrap();
    assert_eq!(config.views.roots, vec![std::path::PathBuf::from("local")]);
    assert_eq!(config.views.default_master, "Site");
}

#[test]
fn local_null_removes_batch() {
    let temp = setup_project(
        "batch:\n  entries:\n    - subject: { action: home }\n",
        Some("batch: null\n"),
    );

    let config = load_merged_config(temp.path()).unwrap();
    assert!(config.batch.is_none());
}

#[test]
fn validation_collects_every_problem() {
    let temp = setup_project(
        r#"
views:
  roots: []
  extension: .html
batch:
  entries:
    - subject: { action: "" }
"#,
        None,
    );

    let config = load_merged_config(temp.path()).unwrap();
    let err = validate(&config).unwrap_err();
    let message = err.to_string();

    assert!(message.contains("At least one view root"));
    assert!(message.contains("must not start with a dot"));
    assert!(message.contains("Batch entry 1 must name an action"));
}

#[test]
fn override_file_must_exist() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.yml");

    let result = load_config(temp.path(), Some(&missing));
    assert!(matches!(result, Err(ViewError::ConfigNotFound { .. })));
}
