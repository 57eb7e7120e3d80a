//! The view factory: resolution, compilation and caching behind one facade.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::ViewSettings;
use crate::error::{Result, ViewError};

use super::batch::{BatchDescriptor, BatchExpander};
use super::builder::DescriptorBuilder;
use super::cache::ViewCache;
use super::compiler::{Compiler, SourceCompiler};
use super::descriptor::{Language, ViewDescriptor};
use super::entry::{ViewEntry, ViewInstance};
use super::folder::{FileSystemFolder, ViewFolder};
use super::key::{ActionContext, ResolutionKey};
use super::locations::{ConventionalLocations, LocationPolicy};

/// Resolves view requests to render-ready instances.
///
/// The factory is `Send + Sync` and is meant to be shared by every request
/// handler of a process.
pub struct ViewFactory {
    builder: DescriptorBuilder,
    compiler: Arc<dyn Compiler>,
    cache: ViewCache,
}

impl ViewFactory {
    pub fn new(
        folder: Arc<dyn ViewFolder>,
        locations: Arc<dyn LocationPolicy>,
        compiler: Arc<dyn Compiler>,
    ) -> Self {
        Self {
            builder: DescriptorBuilder::new(folder, locations),
            compiler,
            cache: ViewCache::new(),
        }
    }

    /// Factory over the filesystem with the bundled source compiler.
    ///
    /// Relative roots are taken from `project_root`.
    pub fn from_settings(project_root: &Path, settings: &ViewSettings) -> Self {
        let roots = settings
            .roots
            .iter()
            .map(|root| project_root.join(root))
            .collect();
        let folder: Arc<dyn ViewFolder> = Arc::new(FileSystemFolder::new(roots));

        Self::new(
            Arc::clone(&folder),
            Arc::new(ConventionalLocations::new(settings)),
            Arc::new(SourceCompiler::new(folder)),
        )
    }

    pub fn builder(&self) -> &DescriptorBuilder {
        &self.builder
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    /// Resolve a view request, compiling and caching it on first use.
    pub fn resolve_view(
        &self,
        namespace: &str,
        action: &str,
        view_name: &str,
        master_name: Option<&str>,
        find_default_master: bool,
        extra_parameters: Vec<String>,
    ) -> Result<RenderResult> {
        let key = ResolutionKey::new(namespace, action, view_name)
            .with_master(master_name)
            .with_default_master(find_default_master)
            .with_extra_parameters(extra_parameters);
        self.resolve(&key)
    }

    /// Resolve an already-built key.
    pub fn resolve(&self, key: &ResolutionKey) -> Result<RenderResult> {
        let entry = self.cache.resolve(key, |key| {
            let descriptor = self.descriptor(key)?;
            self.compiler.compile(&descriptor)
        })?;
        Ok(RenderResult::new(entry))
    }

    /// Resolve a full page view; the default master is used when no master
    /// is named.
    pub fn find_view(
        &self,
        context: &ActionContext,
        view_name: &str,
        master_name: Option<&str>,
    ) -> Result<RenderResult> {
        self.resolve_view(
            &context.namespace,
            &context.action,
            view_name,
            master_name,
            true,
            context.extra_parameters.clone(),
        )
    }

    /// Resolve a partial view: never wrapped in a layout.
    pub fn find_partial_view(
        &self,
        context: &ActionContext,
        partial_name: &str,
    ) -> Result<RenderResult> {
        self.resolve_view(
            &context.namespace,
            &context.action,
            partial_name,
            None,
            false,
            context.extra_parameters.clone(),
        )
    }

    /// Describe a view for an out-of-band compiler without compiling it.
    pub fn describe_view(
        &self,
        action: &str,
        view_name: &str,
        language: Language,
    ) -> Result<ViewToken> {
        let key = ResolutionKey::new("", action, view_name);
        let descriptor = self.descriptor(&key)?.with_language(language);

        Ok(ViewToken {
            action: action.to_string(),
            view_name: view_name.to_string(),
            descriptor,
        })
    }

    /// Expand a batch into descriptors without compiling anything.
    pub fn create_descriptors(&self, batch: &BatchDescriptor) -> Result<Vec<ViewDescriptor>> {
        BatchExpander::new(&self.builder).expand(batch)
    }

    /// Expand and compile a batch, seeding the cache with every entry.
    ///
    /// Stops at the first descriptor that fails to build or compile. The
    /// cache is only seeded once every descriptor has compiled.
    pub fn precompile(&self, batch: &BatchDescriptor) -> Result<Vec<ViewDescriptor>> {
        let descriptors = self.create_descriptors(batch)?;

        let entries = descriptors
            .iter()
            .map(|descriptor| self.compiler.compile(descriptor))
            .collect::<Result<Vec<_>>>()?;

        for (descriptor, entry) in descriptors.iter().zip(entries) {
            self.cache.insert(descriptor.key().clone(), entry);
        }

        info!(
            "Precompiled {} view(s){}",
            descriptors.len(),
            batch
                .output
                .as_deref()
                .map(|output| format!(" for '{}'", output))
                .unwrap_or_default()
        );
        Ok(descriptors)
    }

    fn descriptor(&self, key: &ResolutionKey) -> Result<ViewDescriptor> {
        self.builder.build(key).map_err(|searched| {
            debug!(
                "View '{}' not found after {} probes",
                key.view_name,
                searched.len()
            );
            ViewError::ViewNotFound {
                view: key.view_name.clone(),
                searched,
            }
        })
    }
}

impl fmt::Debug for ViewFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewFactory")
            .field("builder", &self.builder)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// A resolved view ready to render.
///
/// Holds one instance of the entry; the instance is handed back to the
/// entry when the result is dropped.
pub struct RenderResult {
    entry: Arc<dyn ViewEntry>,
    instance: Option<Box<dyn ViewInstance>>,
}

impl RenderResult {
    fn new(entry: Arc<dyn ViewEntry>) -> Self {
        let instance = entry.create_instance();
        Self {
            entry,
            instance: Some(instance),
        }
    }

    pub fn render(&mut self, out: &mut dyn Write) -> Result<()> {
        if let Some(instance) = self.instance.as_mut() {
            instance.render(out)?;
        }
        Ok(())
    }

    /// Render into a string.
    pub fn render_to_string(&mut self) -> Result<String> {
        let mut out = Vec::new();
        self.render(&mut out)?;
        String::from_utf8(out).map_err(|e| ViewError::Other(e.into()))
    }

    pub fn entry(&self) -> &Arc<dyn ViewEntry> {
        &self.entry
    }

    pub fn descriptor(&self) -> &ViewDescriptor {
        self.entry.descriptor()
    }
}

impl Drop for RenderResult {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            self.entry.release_instance(instance);
        }
    }
}

impl fmt::Debug for RenderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderResult")
            .field("entry", &self.entry.id())
            .field("templates", &self.descriptor().templates())
            .finish()
    }
}

/// A described view, for hosts that compile views themselves.
#[derive(Debug, Clone, Serialize)]
pub struct ViewToken {
    pub action: String,
    pub view_name: String,
    pub descriptor: ViewDescriptor,
}
