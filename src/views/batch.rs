//! Batch expansion for precompilation.
//!
//! A [`BatchDescriptor`] names, per subject, which views to include or
//! exclude and which layout chains to combine them with. Expansion turns it
//! into every concrete [`ViewDescriptor`] that must be compiled ahead of
//! time.
//!
//! # Example
//!
//! ```
//! use viewcache::views::{BatchDescriptor, BatchEntry};
//!
//! let batch = BatchDescriptor::new().entry(
//!     BatchEntry::for_subject("admin", "home")
//!         .include("li*")
//!         .exclude("listing")
//!         .layout(["site"])
//!         .layout(["site", "admin"]),
//! );
//! assert_eq!(batch.entries[0].layouts.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, ViewError};

use super::builder::DescriptorBuilder;
use super::descriptor::ViewDescriptor;
use super::key::ResolutionKey;
use super::pattern;

/// The type whose views a batch entry covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSubject {
    /// Namespace (area) used for every key built from this entry.
    #[serde(default)]
    pub namespace: String,
    /// Action whose view folder is listed.
    pub action: String,
}

/// One group of views to precompile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub subject: BatchSubject,
    /// Names or trailing-`*` patterns; empty means everything.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    /// Names or patterns removed from wildcard includes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    /// Layout chains; each inner list is applied together.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layouts: Vec<Vec<String>>,
}

impl BatchEntry {
    pub fn for_subject(namespace: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            subject: BatchSubject {
                namespace: namespace.into(),
                action: action.into(),
            },
            ..Self::default()
        }
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Add a layout chain, innermost name first.
    pub fn layout<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layouts.push(names.into_iter().map(Into::into).collect());
        self
    }
}

/// A full precompilation batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDescriptor {
    /// Name of the compiled output, for hosts that persist it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default)]
    pub entries: Vec<BatchEntry>,
}

impl BatchDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn entry(mut self, entry: BatchEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

/// Expands batch entries into descriptors.
pub struct BatchExpander<'a> {
    builder: &'a DescriptorBuilder,
}

impl<'a> BatchExpander<'a> {
    pub fn new(builder: &'a DescriptorBuilder) -> Self {
        Self { builder }
    }

    /// Expand every entry in order.
    ///
    /// Duplicates across entries are kept. The first descriptor that cannot
    /// be built aborts the whole batch.
    pub fn expand(&self, batch: &BatchDescriptor) -> Result<Vec<ViewDescriptor>> {
        let mut descriptors = Vec::new();
        for entry in &batch.entries {
            descriptors.extend(self.expand_entry(entry)?);
        }
        Ok(descriptors)
    }

    /// Expand a single entry.
    pub fn expand_entry(&self, entry: &BatchEntry) -> Result<Vec<ViewDescriptor>> {
        let view_names = self.view_names(entry)?;
        let subject = &entry.subject;
        let mut descriptors = Vec::new();

        for view_name in view_names {
            let base = ResolutionKey::new(&subject.namespace, &subject.action, view_name);

            if entry.layouts.is_empty() {
                descriptors.push(self.build(base.with_default_master(true))?);
            } else {
                for group in &entry.layouts {
                    let key = base
                        .clone()
                        .with_master(Some(group.join(" ")))
                        .with_default_master(false);
                    descriptors.push(self.build(key)?);
                }
            }
        }

        Ok(descriptors)
    }

    /// View names selected by the entry's include and exclude patterns.
    pub fn view_names(&self, entry: &BatchEntry) -> Result<Vec<String>> {
        let extension = self.builder.locations().extension().to_string();
        let wildcard = [pattern::WILDCARD.to_string()];
        let includes: &[String] = if entry.include.is_empty() {
            &wildcard
        } else {
            &entry.include
        };
        let excludes: Vec<&str> = entry
            .exclude
            .iter()
            .map(|e| pattern::strip_extension(e, &extension))
            .collect();

        let mut names = Vec::new();
        for include in includes {
            if !pattern::is_wildcard(include) {
                // Explicit names skip exclusion
                names.push(pattern::strip_extension(include, &extension).to_string());
                continue;
            }

            for file_name in self.builder.folder().list_views(&entry.subject.action)? {
                if !pattern::has_extension(&file_name, &extension) {
                    continue;
                }

                let candidate = pattern::strip_extension(&file_name, &extension);
                if !pattern::matches(candidate, include) {
                    continue;
                }
                if excludes.iter().any(|e| pattern::matches(candidate, e)) {
                    continue;
                }
                names.push(candidate.to_string());
            }
        }

        debug!(
            "Batch subject '{}' selected views {:?}",
            entry.subject.action, names
        );
        Ok(names)
    }

    fn build(&self, key: ResolutionKey) -> Result<ViewDescriptor> {
        self.builder.build(&key).map_err(|searched| {
            warn!(
                "Batch build failed for '{}' after searching {}",
                key.view_name, searched
            );
            ViewError::BatchBuild {
                view: key.view_name.clone(),
                searched,
            }
        })
    }
}
