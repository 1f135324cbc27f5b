//! `helpdocs operations` command implementation.

use std::path::PathBuf;

use clap::Args;
use helpdocs_config::Config;

use super::{help_center, require_zendesk};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the operations command.
#[derive(Args)]
pub(crate) struct OperationsArgs {
    /// Path to configuration file (default: auto-discover helpdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl OperationsArgs {
    /// Print every resource kind and its operations.
    ///
    /// # Errors
    ///
    /// Returns an error if the `[zendesk]` configuration is missing or invalid.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;
        let zendesk = require_zendesk(&config, &output)?;
        let client = help_center(&config, zendesk)?;

        output.highlight(&format!("Help Center API at {}", zendesk.api_base_url()));
        for resource in client.resources() {
            output.info(&format!(
                "{resource:<20} {}",
                client.operations(resource).join(", ")
            ));
        }
        Ok(())
    }
}
