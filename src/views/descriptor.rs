//! View descriptors and search traces.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::key::ResolutionKey;

/// Output dialect a descriptor is compiled for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Server-side rendering.
    #[default]
    Default,
    /// Client-side template emitted as script.
    Javascript,
}

/// A resolved, renderable unit: the primary view followed by its layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewDescriptor {
    templates: Vec<String>,
    language: Language,
    key: ResolutionKey,
}

impl ViewDescriptor {
    /// Create a descriptor for a primary view with no layouts yet.
    pub fn new(key: ResolutionKey, primary: impl Into<String>) -> Self {
        Self {
            templates: vec![primary.into()],
            language: Language::Default,
            key,
        }
    }

    /// Append a layout outside the templates already present.
    pub(crate) fn push_layout(&mut self, layout: impl Into<String>) {
        self.templates.push(layout.into());
    }

    /// Refine the output dialect.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// All templates, innermost first. Never empty.
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// The primary (innermost) view.
    pub fn primary(&self) -> &str {
        &self.templates[0]
    }

    /// Layouts applied around the primary view, innermost first.
    pub fn layouts(&self) -> &[String] {
        &self.templates[1..]
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// The request that produced this descriptor.
    pub fn key(&self) -> &ResolutionKey {
        &self.key
    }
}

/// Every location examined while resolving a descriptor, in visiting order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTrace(Vec<String>);

impl SearchTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, location: impl Into<String>) {
        self.0.push(location.into());
    }

    pub fn locations(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SearchTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_descriptor_has_only_primary() {
        let key = ResolutionKey::new("", "home", "index");
        let descriptor = ViewDescriptor::new(key.clone(), "home/index.html");

        assert_eq!(descriptor.templates(), ["home/index.html"]);
        assert_eq!(descriptor.primary(), "home/index.html");
        assert!(descriptor.layouts().is_empty());
        assert_eq!(descriptor.key(), &key);
        assert_eq!(descriptor.language(), Language::Default);
    }

    #[test]
    fn layouts_follow_primary_in_outward_order() {
        let mut descriptor =
            ViewDescriptor::new(ResolutionKey::new("", "home", "index"), "home/index.html");
        descriptor.push_layout("Layouts/site.html");
        descriptor.push_layout("Shared/Application.html");

        assert_eq!(descriptor.primary(), "home/index.html");
        assert_eq!(
            descriptor.layouts(),
            ["Layouts/site.html", "Shared/Application.html"]
        );
    }

    #[test]
    fn language_can_be_refined() {
        let descriptor =
            ViewDescriptor::new(ResolutionKey::new("", "home", "index"), "home/index.html")
                .with_language(Language::Javascript);
        assert_eq!(descriptor.language(), Language::Javascript);
    }

    #[test]
    fn trace_displays_comma_separated() {
        let mut trace = SearchTrace::new();
        assert!(trace.is_empty());
        trace.record("home/index.html");
        trace.record("Shared/index.html");
        assert_eq!(trace.to_string(), "home/index.html, Shared/index.html");
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn descriptor_serializes_templates_and_key() {
        let descriptor =
            ViewDescriptor::new(ResolutionKey::new("", "home", "index"), "home/index.html");
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["templates"][0], "home/index.html");
        assert_eq!(json["key"]["action"], "home");
        assert_eq!(json["language"], "default");
    }
}
