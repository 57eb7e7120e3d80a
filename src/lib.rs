//! viewcache - View resolution and compilation caching.
//!
//! Given a view request (namespace, action, view name, optional master
//! layout and extra parameters), viewcache finds the templates that make up
//! the view, compiles them once and hands out render-ready instances,
//! rebuilding an entry when its sources change.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`views`] - Descriptor building, the entry cache and batch precompilation
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use viewcache::views::{ConventionalLocations, InMemoryFolder, SourceCompiler, ViewFactory};
//!
//! let folder = Arc::new(
//!     InMemoryFolder::new()
//!         .with_view("home/index.html", "<p>hello</p>")
//!         .with_view("Layouts/site.html", "<footer/>"),
//! );
//! let factory = ViewFactory::new(
//!     folder.clone(),
//!     Arc::new(ConventionalLocations::default()),
//!     Arc::new(SourceCompiler::new(folder)),
//! );
//!
//! let mut view = factory
//!     .resolve_view("", "home", "index", Some("site"), false, vec![])
//!     .unwrap();
//! assert_eq!(view.render_to_string().unwrap(), "<p>hello</p><footer/>");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod views;

pub use error::{Result, ViewError};
