//! View resolution and compilation caching.
//!
//! A request names a view, the action it belongs to and optionally a master
//! layout. The [`DescriptorBuilder`] turns it into a [`ViewDescriptor`] by
//! probing conventional locations, a [`Compiler`] turns the descriptor into
//! a [`ViewEntry`], and the [`ViewCache`] keeps entries until their sources
//! change. [`ViewFactory`] ties the pieces together.

pub mod batch;
pub mod builder;
pub mod cache;
pub mod compiler;
pub mod descriptor;
pub mod entry;
pub mod factory;
pub mod folder;
pub mod key;
pub mod locations;
pub mod pattern;

pub use batch::{BatchDescriptor, BatchEntry, BatchExpander, BatchSubject};
pub use builder::DescriptorBuilder;
pub use cache::{CacheStats, ViewCache};
pub use compiler::{Compiler, SourceCompiler, SourceEntry};
pub use descriptor::{Language, SearchTrace, ViewDescriptor};
pub use entry::{ViewEntry, ViewInstance};
pub use factory::{RenderResult, ViewFactory, ViewToken};
pub use folder::{FileSystemFolder, InMemoryFolder, ViewFolder};
pub use key::{ActionContext, ResolutionKey};
pub use locations::{ConventionalLocations, LocationPolicy};
