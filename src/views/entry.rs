//! Compiled view entries and the instances they hand out.

use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use super::descriptor::ViewDescriptor;

/// A compiled, render-ready artifact for one descriptor.
///
/// Entries are shared between concurrent renders, so `create_instance`
/// must be callable from many threads at once. Instances are not shared.
pub trait ViewEntry: Send + Sync {
    /// Unique id of this compiled artifact.
    fn id(&self) -> u64;

    /// The descriptor this entry was compiled from.
    fn descriptor(&self) -> &ViewDescriptor;

    /// Produce a fresh instance for one render.
    fn create_instance(&self) -> Box<dyn ViewInstance>;

    /// Hand back an instance once its render is finished.
    fn release_instance(&self, instance: Box<dyn ViewInstance>);

    /// Whether the compiled artifact still matches its sources.
    fn is_current(&self) -> bool;

    /// The source this entry was compiled from, for diagnostics.
    ///
    /// Compilers that do not keep their input return `None`.
    fn source(&self) -> Option<String> {
        None
    }
}

/// One renderable view.
pub trait ViewInstance: Send {
    fn render(&mut self, out: &mut dyn Write) -> std::io::Result<()>;
}

static NEXT_ENTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique entry id.
pub fn next_entry_id() -> u64 {
    NEXT_ENTRY_ID.fetch_add(1, Ordering::Relaxed)
}
