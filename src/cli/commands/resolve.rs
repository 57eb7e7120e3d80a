//! Resolve command implementation.
//!
//! The `viewcache resolve` command resolves one view request and prints the
//! templates it resolved to, or renders them.

use std::io::Write;

use serde_json::json;

use crate::cli::args::ResolveArgs;
use crate::error::{Result, ViewError};
use crate::views::ViewFactory;

use super::dispatcher::{Command, CommandResult};

/// The resolve command implementation.
pub struct ResolveCommand<'a> {
    factory: &'a ViewFactory,
    args: ResolveArgs,
}

impl<'a> ResolveCommand<'a> {
    /// Create a new resolve command.
    pub fn new(factory: &'a ViewFactory, args: ResolveArgs) -> Self {
        Self { factory, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ResolveArgs {
        &self.args
    }
}

impl Command for ResolveCommand<'_> {
    fn execute(&self, out: &mut dyn Write, err: &mut dyn Write) -> Result<CommandResult> {
        let args = &self.args;
        let resolved = self.factory.resolve_view(
            args.namespace.as_deref().unwrap_or_default(),
            &args.action,
            &args.view,
            args.master.as_deref(),
            !args.no_default_master,
            args.params.clone(),
        );

        let mut result = match resolved {
            Ok(result) => result,
            Err(ViewError::ViewNotFound { view, searched }) => {
                if args.json {
                    let report = json!({
                        "error": "not_found",
                        "view": view,
                        "searched": searched,
                    });
                    let json = serde_json::to_string_pretty(&report)
                        .map_err(|e| ViewError::Other(e.into()))?;
                    writeln!(out, "{}", json)?;
                } else {
                    writeln!(err, "View '{}' could not be found. Searched:", view)?;
                    for location in searched.locations() {
                        writeln!(err, "  {}", location)?;
                    }
                }
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        if args.render {
            result.render(out)?;
        } else if args.json {
            let json = serde_json::to_string_pretty(result.descriptor())
                .map_err(|e| ViewError::Other(e.into()))?;
            writeln!(out, "{}", json)?;
        } else {
            for template in result.descriptor().templates() {
                writeln!(out, "{}", template)?;
            }
        }

        Ok(CommandResult::success())
    }
}
