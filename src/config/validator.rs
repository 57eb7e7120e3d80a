//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - At least one view root, none of them blank
//! - Extension is non-empty and has no leading dot
//! - Folder names and the default master are non-empty
//! - Batch entries name an action and carry no blank patterns

use crate::config::schema::{ViewSettings, ViewcacheConfig};
use crate::error::{Result, ViewError};
use crate::views::BatchDescriptor;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Index of the batch entry if error is entry-specific
    pub entry: Option<usize>,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
            entry: None,
        }
    }

    fn for_entry(rule: &str, entry: usize, message: impl Into<String>) -> Self {
        Self {
            entry: Some(entry),
            ..Self::new(rule, message)
        }
    }
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &ViewcacheConfig) -> Vec<ValidationError> {
    let mut errors = validate_views(&config.views);

    if let Some(batch) = &config.batch {
        errors.extend(batch_errors(batch));
    }

    errors
}

/// Validate view location settings.
fn validate_views(views: &ViewSettings) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if views.roots.is_empty() {
        errors.push(ValidationError::new(
            "missing-roots",
            "At least one view root must be configured",
        ));
    }
    if views.roots.iter().any(|root| root.as_os_str().is_empty()) {
        errors.push(ValidationError::new("blank-root", "View roots must not be blank"));
    }

    if views.extension.trim().is_empty() {
        errors.push(ValidationError::new(
            "missing-extension",
            "Template extension must not be empty",
        ));
    } else if views.extension.starts_with('.') {
        errors.push(ValidationError::new(
            "dotted-extension",
            format!(
                "Template extension '{}' must not start with a dot",
                views.extension
            ),
        ));
    }

    for (field, value) in [
        ("shared_folder", &views.shared_folder),
        ("layouts_folder", &views.layouts_folder),
        ("default_master", &views.default_master),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(
                "blank-setting",
                format!("'{}' must not be empty", field),
            ));
        }
    }

    errors
}

/// Validate batch entries and return all errors.
pub fn batch_errors(batch: &BatchDescriptor) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (index, entry) in batch.entries.iter().enumerate() {
        if entry.subject.action.trim().is_empty() {
            errors.push(ValidationError::for_entry(
                "missing-action",
                index,
                format!("Batch entry {} must name an action", index + 1),
            ));
        }

        let patterns = entry.include.iter().chain(entry.exclude.iter());
        let layouts = entry.layouts.iter().flatten();
        if patterns.chain(layouts).any(|p| p.trim().is_empty()) {
            errors.push(ValidationError::for_entry(
                "blank-pattern",
                index,
                format!(
                    "Batch entry {} has a blank include, exclude or layout name",
                    index + 1
                ),
            ));
        }
    }

    errors
}

/// Validate and return Result (for convenience).
///
/// # Errors
///
/// Returns `ConfigValidationError` if any validation rules fail.
pub fn validate(config: &ViewcacheConfig) -> Result<()> {
    into_result(validate_config(config))
}

/// Validate a batch loaded on its own, such as a `--batch` file.
///
/// # Errors
///
/// Returns `ConfigValidationError` if any batch rule fails.
pub fn validate_batch(batch: &BatchDescriptor) -> Result<()> {
    into_result(batch_errors(batch))
}

fn into_result(errors: Vec<ValidationError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(ViewError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::BatchEntry;

    fn rules(config: &ViewcacheConfig) -> Vec<String> {
        validate_config(config).into_iter().map(|e| e.rule).collect()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ViewcacheConfig::default()).is_empty());
    }

    #[test]
    fn rejects_missing_roots() {
        let mut config = ViewcacheConfig::default();
        config.views.roots.clear();
        assert_eq!(rules(&config), vec!["missing-roots"]);
    }

    #[test]
    fn rejects_dotted_extension() {
        let mut config = ViewcacheConfig::default();
        config.views.extension = ".html".to_string();
        assert_eq!(rules(&config), vec!["dotted-extension"]);
    }

    #[test]
    fn rejects_empty_extension() {
        let mut config = ViewcacheConfig::default();
        config.views.extension = " ".to_string();
        assert_eq!(rules(&config), vec!["missing-extension"]);
    }

    #[test]
    fn reports_every_blank_setting() {
        let mut config = ViewcacheConfig::default();
        config.views.shared_folder.clear();
        config.views.default_master.clear();

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("shared_folder"));
        assert!(errors[1].message.contains("default_master"));
    }

    #[test]
    fn standalone_batch_uses_batch_rules() {
        let batch = BatchDescriptor::new()
            .entry(BatchEntry::for_subject("", "home"))
            .entry(BatchEntry::for_subject("", "").include(" "));

        let rules: Vec<_> = batch_errors(&batch).into_iter().map(|e| e.rule).collect();
        assert_eq!(rules, vec!["missing-action", "blank-pattern"]);

        let err = validate_batch(&batch).unwrap_err();
        assert!(err.to_string().contains("Batch entry 2 must name an action"));
        assert!(validate_batch(&BatchDescriptor::new()).is_ok());
    }

    #[test]
    fn rejects_batch_entry_without_action() {
        let config = ViewcacheConfig {
            batch: Some(BatchDescriptor::new().entry(BatchEntry::for_subject("admin", ""))),
            ..Default::default()
        };

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "missing-action");
        assert_eq!(errors[0].entry, Some(0));
    }

    #[test]
    fn rejects_blank_patterns() {
        let config = ViewcacheConfig {
            batch: Some(
                BatchDescriptor::new()
                    .entry(BatchEntry::for_subject("", "home"))
                    .entry(BatchEntry::for_subject("", "home").exclude("").layout(["site"])),
            ),
            ..Default::default()
        };

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "blank-pattern");
        assert_eq!(errors[0].entry, Some(1));
    }

    #[test]
    fn validate_joins_messages() {
        let mut config = ViewcacheConfig::default();
        config.views.roots.clear();
        config.views.extension = ".html".to_string();

        let err = validate(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: At least one view root must be configured; \
             Template extension '.html' must not start with a dot"
        );
    }
}
