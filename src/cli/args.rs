//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// viewcache - Resolve, compile and cache views.
#[derive(Debug, Parser)]
#[command(name = "viewcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .viewcache/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides discovery from the current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a view and show its templates
    Resolve(ResolveArgs),

    /// Expand and compile a precompilation batch
    Precompile(PrecompileArgs),
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ResolveArgs {
    /// View name
    pub view: String,

    /// Action whose view folder is searched first
    #[arg(short, long)]
    pub action: String,

    /// Namespace (area) searched before the root folders
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Master layout; several names form a chain (innermost first)
    #[arg(short, long)]
    pub master: Option<String>,

    /// Do not fall back to a default master
    #[arg(long)]
    pub no_default_master: bool,

    /// Extra resolution parameter (repeatable)
    #[arg(long = "param", value_name = "PARAM")]
    pub params: Vec<String>,

    /// Render the view instead of listing its templates
    #[arg(long)]
    pub render: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ResolveArgs {
    /// Arguments for resolving `view` under `action` with defaults elsewhere.
    pub fn new(view: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            action: action.into(),
            namespace: None,
            master: None,
            no_default_master: false,
            params: Vec::new(),
            render: false,
            json: false,
        }
    }
}

/// Arguments for the `precompile` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PrecompileArgs {
    /// Batch file (YAML); defaults to the `batch` section of the config
    #[arg(short, long)]
    pub batch: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
