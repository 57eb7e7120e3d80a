//! Error types for view resolution and compilation.
//!
//! This module defines [`ViewError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Resolution failures carry the full [`SearchTrace`] so an operator can
//!   see every location that was examined without re-running verbosely
//! - Compiler failures are produced by [`Compiler`](crate::views::Compiler)
//!   implementations and passed through untouched
//! - Use `anyhow::Error` (via `ViewError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::views::SearchTrace;

/// Core error type for view operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The primary view or a required master could not be located.
    #[error("View '{view}' could not be found in any of the following locations: {searched}")]
    ViewNotFound { view: String, searched: SearchTrace },

    /// A descriptor inside a precompilation batch could not be built.
    #[error("Unable to find templates for '{view}' at {searched}")]
    BatchBuild { view: String, searched: SearchTrace },

    /// The template compiler rejected a descriptor.
    #[error("Failed to compile view '{view}': {message}")]
    Compilation { view: String, message: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ViewError {
    /// The search trace attached to a resolution failure, if any.
    pub fn search_trace(&self) -> Option<&SearchTrace> {
        match self {
            ViewError::ViewNotFound { searched, .. } | ViewError::BatchBuild { searched, .. } => {
                Some(searched)
            }
            _ => None,
        }
    }
}

/// Result type alias for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
