//! Descriptor building: from a resolution key to an ordered template list.

use std::sync::Arc;

use tracing::debug;

use super::descriptor::{SearchTrace, ViewDescriptor};
use super::folder::ViewFolder;
use super::key::ResolutionKey;
use super::locations::LocationPolicy;

/// Builds [`ViewDescriptor`]s by probing a [`ViewFolder`] in the order a
/// [`LocationPolicy`] dictates.
///
/// Resolution order:
/// 1. Primary view (first existing candidate wins)
/// 2. Each name of an explicit master chain, all of them required
/// 3. Otherwise, when asked, the first existing default master
#[derive(Clone)]
pub struct DescriptorBuilder {
    folder: Arc<dyn ViewFolder>,
    locations: Arc<dyn LocationPolicy>,
}

impl DescriptorBuilder {
    pub fn new(folder: Arc<dyn ViewFolder>, locations: Arc<dyn LocationPolicy>) -> Self {
        Self { folder, locations }
    }

    pub fn folder(&self) -> &Arc<dyn ViewFolder> {
        &self.folder
    }

    pub fn locations(&self) -> &Arc<dyn LocationPolicy> {
        &self.locations
    }

    /// Build the descriptor for `key`.
    ///
    /// On failure returns every location examined, in the order examined.
    pub fn build(&self, key: &ResolutionKey) -> std::result::Result<ViewDescriptor, SearchTrace> {
        let mut searched = SearchTrace::new();

        let Some(primary) = self.locate(self.locations.view_locations(key), &mut searched) else {
            return Err(searched);
        };
        let mut descriptor = ViewDescriptor::new(key.clone(), primary);

        let masters = key.master_names();
        if !masters.is_empty() {
            for master in masters {
                match self.locate(self.locations.master_locations(key, master), &mut searched) {
                    Some(layout) => descriptor.push_layout(layout),
                    None => return Err(searched),
                }
            }
        } else if key.find_default_master {
            for master in self.locations.default_masters(key) {
                if let Some(layout) =
                    self.locate(self.locations.master_locations(key, &master), &mut searched)
                {
                    descriptor.push_layout(layout);
                    break;
                }
            }
        }

        debug!(
            "Resolved view '{}' to {:?} after {} probes",
            key.view_name,
            descriptor.templates(),
            searched.len()
        );
        Ok(descriptor)
    }

    /// First existing candidate, recording every probe.
    fn locate(&self, candidates: Vec<String>, searched: &mut SearchTrace) -> Option<String> {
        for candidate in candidates {
            searched.record(candidate.as_str());
            if self.folder.has_view(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

impl std::fmt::Debug for DescriptorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorBuilder")
            .field("extension", &self.locations.extension())
            .finish_non_exhaustive()
    }
}
