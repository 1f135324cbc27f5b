//! CLI error types.

use helpdocs_config::ConfigError;
use helpdocs_zendesk::{PublishError, ZendeskError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Zendesk(#[from] ZendeskError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0} article(s) failed to publish")]
    ArticlesFailed(usize),
}
