//! Search order for views and layouts.
//!
//! The order in which candidate locations are tried is policy, not
//! mechanism: [`DescriptorBuilder`](super::DescriptorBuilder) walks whatever
//! a [`LocationPolicy`] hands it. Policies receive the whole key, so a
//! custom policy may fold the extra parameters into its locations (a
//! per-locale or per-theme folder, say).

use crate::config::ViewSettings;

use super::key::ResolutionKey;
use super::pattern;

/// Supplies candidate locations for a resolution.
pub trait LocationPolicy: Send + Sync {
    /// Candidate locations for the primary view, most specific first.
    fn view_locations(&self, key: &ResolutionKey) -> Vec<String>;

    /// Candidate locations for one named layout, most specific first.
    fn master_locations(&self, key: &ResolutionKey, master: &str) -> Vec<String>;

    /// Layout names to try, in order, when no master is given and the key
    /// asks for a default.
    fn default_masters(&self, key: &ResolutionKey) -> Vec<String>;

    /// Template file extension, without the leading dot.
    fn extension(&self) -> &str;
}

/// Folder conventions: action folder, then shared; layouts folder, then
/// shared; the namespace (area) is tried before the root.
#[derive(Debug, Clone)]
pub struct ConventionalLocations {
    extension: String,
    shared_folder: String,
    layouts_folder: String,
    default_master: String,
}

impl ConventionalLocations {
    pub fn new(settings: &ViewSettings) -> Self {
        Self {
            extension: settings.extension.clone(),
            shared_folder: settings.shared_folder.clone(),
            layouts_folder: settings.layouts_folder.clone(),
            default_master: settings.default_master.clone(),
        }
    }

    fn file_name(&self, name: &str) -> String {
        if pattern::has_extension(name, &self.extension) {
            name.to_string()
        } else {
            format!("{}.{}", name, self.extension)
        }
    }

    /// `folders` joined with the file name, area-qualified first.
    fn candidates(&self, namespace: &str, folders: &[&str], file: &str) -> Vec<String> {
        let mut locations = Vec::new();
        let namespace = namespace.trim_matches('/');

        if !namespace.is_empty() {
            for folder in folders {
                locations.push(format!("{}/{}/{}", namespace, folder, file));
            }
        }
        for folder in folders {
            locations.push(format!("{}/{}", folder, file));
        }

        locations
    }
}

impl Default for ConventionalLocations {
    fn default() -> Self {
        Self::new(&ViewSettings::default())
    }
}

impl LocationPolicy for ConventionalLocations {
    fn view_locations(&self, key: &ResolutionKey) -> Vec<String> {
        let file = self.file_name(&key.view_name);
        self.candidates(&key.namespace, &[key.action.as_str(), self.shared_folder.as_str()], &file)
    }

    fn master_locations(&self, key: &ResolutionKey, master: &str) -> Vec<String> {
        let file = self.file_name(master);
        self.candidates(
            &key.namespace,
            &[self.layouts_folder.as_str(), self.shared_folder.as_str()],
            &file,
        )
    }

    fn default_masters(&self, key: &ResolutionKey) -> Vec<String> {
        let mut names = Vec::new();
        if !key.action.is_empty() {
            names.push(key.action.clone());
        }
        if !names.contains(&self.default_master) {
            names.push(self.default_master.clone());
        }
        names
    }

    fn extension(&self) -> &str {
        &self.extension
    }
}
