//! Precompile command implementation.
//!
//! The `viewcache precompile` command expands a batch, compiles every
//! descriptor and lists what was compiled.

use std::fs;
use std::io::Write;

use crate::cli::args::PrecompileArgs;
use crate::config::validate_batch;
use crate::error::{Result, ViewError};
use crate::views::{BatchDescriptor, ViewFactory};

use super::dispatcher::{Command, CommandResult};

/// The precompile command implementation.
pub struct PrecompileCommand<'a> {
    factory: &'a ViewFactory,
    configured: Option<&'a BatchDescriptor>,
    args: PrecompileArgs,
}

impl<'a> PrecompileCommand<'a> {
    /// Create a new precompile command.
    ///
    /// `configured` is the batch from the config file, used when no batch
    /// file is given.
    pub fn new(
        factory: &'a ViewFactory,
        configured: Option<&'a BatchDescriptor>,
        args: PrecompileArgs,
    ) -> Self {
        Self {
            factory,
            configured,
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &PrecompileArgs {
        &self.args
    }

    /// The batch to run: the `--batch` file if given, else the configured
    /// one. A batch file is held to the same rules as the config.
    fn load_batch(&self) -> Result<Option<BatchDescriptor>> {
        let Some(path) = &self.args.batch else {
            return Ok(self.configured.cloned());
        };

        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ViewError::ConfigNotFound { path: path.clone() }
            } else {
                ViewError::Io(e)
            }
        })?;
        let batch = serde_yaml::from_str(&content).map_err(|e| ViewError::ConfigParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;
        validate_batch(&batch)?;
        Ok(Some(batch))
    }
}

impl Command for PrecompileCommand<'_> {
    fn execute(&self, out: &mut dyn Write, err: &mut dyn Write) -> Result<CommandResult> {
        let Some(batch) = self.load_batch()? else {
            writeln!(
                err,
                "No batch configured. Add a 'batch' section to the config or pass --batch."
            )?;
            return Ok(CommandResult::failure(2));
        };

        let descriptors = self.factory.precompile(&batch)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&descriptors)
                .map_err(|e| ViewError::Other(e.into()))?;
            writeln!(out, "{}", json)?;
        } else {
            for descriptor in &descriptors {
                writeln!(out, "{}", descriptor.templates().join(" < "))?;
            }
            writeln!(out, "Precompiled {} view(s)", descriptors.len())?;
        }

        Ok(CommandResult::success())
    }
}
