//! Compilers turn descriptors into view entries.
//!
//! The crate does not interpret template syntax. [`SourceCompiler`] is the
//! bundled implementation: it snapshots each template's source and writes
//! them back innermost first, and it detects staleness by fingerprinting
//! the sources it was built from.

use sha2::{Digest, Sha256};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{Result, ViewError};

use super::descriptor::ViewDescriptor;
use super::entry::{next_entry_id, ViewEntry, ViewInstance};
use super::folder::ViewFolder;

/// Sources larger than this are fingerprinted by stamp and size only.
const CONTENT_HASH_LIMIT: u64 = 1024 * 1024;

/// Builds a [`ViewEntry`] from a [`ViewDescriptor`].
pub trait Compiler: Send + Sync {
    fn compile(&self, descriptor: &ViewDescriptor) -> Result<Arc<dyn ViewEntry>>;
}

/// Compiles by snapshotting template sources from a [`ViewFolder`].
#[derive(Clone)]
pub struct SourceCompiler {
    folder: Arc<dyn ViewFolder>,
}

impl SourceCompiler {
    pub fn new(folder: Arc<dyn ViewFolder>) -> Self {
        Self { folder }
    }
}

impl Compiler for SourceCompiler {
    fn compile(&self, descriptor: &ViewDescriptor) -> Result<Arc<dyn ViewEntry>> {
        let mut hasher = Sha256::new();
        let mut sources = Vec::with_capacity(descriptor.templates().len());

        // The snapshot and the fingerprint come from the same reads, so an
        // edit racing the compile leaves the entry stale rather than current.
        for location in descriptor.templates() {
            let source = match hash_location(&mut hasher, self.folder.as_ref(), location) {
                Some(source) => source,
                None => {
                    self.folder
                        .read_source(location)
                        .map_err(|e| ViewError::Compilation {
                            view: location.clone(),
                            message: e.to_string(),
                        })?
                }
            };
            sources.push(source);
        }

        Ok(Arc::new(SourceEntry {
            id: next_entry_id(),
            descriptor: descriptor.clone(),
            sources: sources.into(),
            fingerprint: finish(hasher),
            folder: Arc::clone(&self.folder),
            live_instances: AtomicUsize::new(0),
        }))
    }
}

/// Compute a fingerprint over a set of template locations.
///
/// The hash includes:
/// - Location
/// - Modification time
/// - Source size
/// - Source content (for sources under 1MB)
///
/// Missing locations contribute a marker, so a deleted template changes the
/// fingerprint too.
pub fn fingerprint(folder: &dyn ViewFolder, locations: &[String]) -> String {
    let mut hasher = Sha256::new();
    for location in locations {
        hash_location(&mut hasher, folder, location);
    }
    finish(hasher)
}

/// Feed one location into `hasher`, returning its source if it was read.
///
/// The stamp and size are taken before the content, and the content is only
/// read when the size is under [`CONTENT_HASH_LIMIT`].
fn hash_location(
    hasher: &mut Sha256,
    folder: &dyn ViewFolder,
    location: &str,
) -> Option<String> {
    hasher.update(location.as_bytes());

    let modified = folder.last_modified(location);
    let Some(size) = folder.source_size(location) else {
        hasher.update(b"\0missing");
        return None;
    };

    if let Some(modified) = modified {
        hasher.update(modified.to_rfc3339().as_bytes());
    }
    hasher.update(size.to_le_bytes());

    if size >= CONTENT_HASH_LIMIT {
        return None;
    }

    match folder.read_source(location) {
        Ok(source) => {
            hasher.update(source.as_bytes());
            Some(source)
        }
        Err(_) => {
            hasher.update(b"\0missing");
            None
        }
    }
}

fn finish(hasher: Sha256) -> String {
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

/// Entry produced by [`SourceCompiler`].
pub struct SourceEntry {
    id: u64,
    descriptor: ViewDescriptor,
    sources: Arc<[String]>,
    fingerprint: String,
    folder: Arc<dyn ViewFolder>,
    live_instances: AtomicUsize,
}

impl SourceEntry {
    /// Fingerprint of the sources at compile time.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Template sources as read at compile time, innermost first.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Instances created and not yet released.
    pub fn live_instances(&self) -> usize {
        self.live_instances.load(Ordering::Relaxed)
    }
}

impl ViewEntry for SourceEntry {
    fn id(&self) -> u64 {
        self.id
    }

    fn descriptor(&self) -> &ViewDescriptor {
        &self.descriptor
    }

    fn create_instance(&self) -> Box<dyn ViewInstance> {
        self.live_instances.fetch_add(1, Ordering::Relaxed);
        Box::new(SourceView {
            sources: Arc::clone(&self.sources),
        })
    }

    fn release_instance(&self, instance: Box<dyn ViewInstance>) {
        self.live_instances.fetch_sub(1, Ordering::Relaxed);
        drop(instance);
    }

    fn is_current(&self) -> bool {
        fingerprint(self.folder.as_ref(), self.descriptor.templates()) == self.fingerprint
    }

    fn source(&self) -> Option<String> {
        Some(self.sources.concat())
    }
}

/// Instance produced by [`SourceEntry`].
pub struct SourceView {
    sources: Arc<[String]>,
}

impl ViewInstance for SourceView {
    fn render(&mut self, out: &mut dyn Write) -> std::io::Result<()> {
        for source in self.sources.iter() {
            out.write_all(source.as_bytes())?;
        }
        Ok(())
    }
}
