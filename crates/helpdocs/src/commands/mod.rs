//! CLI command implementations.

pub(crate) mod operations;
pub(crate) mod publish;

pub(crate) use operations::OperationsArgs;
pub(crate) use publish::PublishArgs;

use helpdocs_config::{Config, ZendeskConfig};
use helpdocs_zendesk::{HelpCenter, HttpTransport, MAX_CONCURRENT, MAX_RETRIES};

use crate::error::CliError;
use crate::output::Output;

/// Return the validated `[zendesk]` section, printing a sample on failure.
fn require_zendesk<'a>(
    config: &'a Config,
    output: &Output,
) -> Result<&'a ZendeskConfig, CliError> {
    config.require_zendesk().map_err(|e| {
        output.error(&format!("Error: {e}"));
        output.info("\nAdd the following to your helpdocs.toml:");
        output.info("\n[zendesk]");
        output.info(r#"url = "https://acme.zendesk.com""#);
        output.info(r#"username = "docs@acme.com""#);
        output.info(r#"token = "${ZENDESK_TOKEN}""#);
        CliError::Config(e)
    })
}

/// Build a help center client over HTTP using the `[publish]` limits.
fn help_center(
    config: &Config,
    zendesk: &ZendeskConfig,
) -> Result<HelpCenter<HttpTransport>, CliError> {
    let client = HelpCenter::builder()
        .transport(HttpTransport::from_config(zendesk)?)
        .max_concurrent(config.publish.max_concurrent.unwrap_or(MAX_CONCURRENT))
        .max_retries(config.publish.max_retries.unwrap_or(MAX_RETRIES))
        .build()?;
    Ok(client)
}
