//! Resolution keys and the action context they are derived from.

use serde::{Deserialize, Serialize};

/// Identity of a logical view request, independent of where it lives on disk.
///
/// Two keys are equal when every field is equal; `extra_parameters` compare
/// element-wise and in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionKey {
    /// Area or namespace of the action; empty for none.
    pub namespace: String,
    /// Action name; selects the action-specific view folder.
    pub action: String,
    /// View name, with or without the template extension.
    pub view_name: String,
    /// Explicit master (layout) chain, whitespace or comma separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_name: Option<String>,
    /// Look for a default master when `master_name` is absent.
    pub find_default_master: bool,
    /// Additional lookup parameters supplied by the hosting framework.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_parameters: Vec<String>,
}

impl ResolutionKey {
    /// Create a key with no master, no default master and no extra parameters.
    pub fn new(
        namespace: impl Into<String>,
        action: impl Into<String>,
        view_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            action: action.into(),
            view_name: view_name.into(),
            master_name: None,
            find_default_master: false,
            extra_parameters: Vec::new(),
        }
    }

    /// Set the explicit master name. Blank names are treated as absent.
    pub fn with_master(mut self, master: Option<impl Into<String>>) -> Self {
        self.master_name = master.map(Into::into).filter(|m| !m.trim().is_empty());
        self
    }

    /// Enable or disable the default master lookup.
    pub fn with_default_master(mut self, find_default_master: bool) -> Self {
        self.find_default_master = find_default_master;
        self
    }

    /// Set the extra parameters.
    pub fn with_extra_parameters(mut self, extra: Vec<String>) -> Self {
        self.extra_parameters = extra;
        self
    }

    /// Layout names from the master chain, in the order given.
    pub fn master_names(&self) -> Vec<&str> {
        self.master_name
            .as_deref()
            .map(|m| {
                m.split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The bare request attributes an action-dispatch layer hands over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionContext {
    pub namespace: String,
    pub action: String,
    pub extra_parameters: Vec<String>,
}

impl ActionContext {
    pub fn new(namespace: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            action: action.into(),
            extra_parameters: Vec::new(),
        }
    }

    pub fn with_extra_parameters(mut self, extra: Vec<String>) -> Self {
        self.extra_parameters = extra;
        self
    }
}
