//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which loads the
//! configuration, builds the [`ViewFactory`](crate::views::ViewFactory) and
//! routes CLI subcommands to their implementations.

pub mod dispatcher;
pub mod precompile;
pub mod resolve;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
