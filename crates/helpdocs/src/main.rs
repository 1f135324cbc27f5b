//! helpdocs CLI - publish Markdown documentation to a Zendesk Help Center.
//!
//! Provides commands for:
//! - `publish`: Publish the documentation tree (or preview it with `--dry-run`)
//! - `operations`: List the help center operations available to the client

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{OperationsArgs, PublishArgs};
use error::CliError;
use output::Output;

/// helpdocs - Markdown to Zendesk Help Center publisher.
#[derive(Parser)]
#[command(name = "helpdocs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the documentation tree.
    Publish(PublishArgs),
    /// List available help center operations.
    Operations(OperationsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Publish(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Publish(args) => run(args),
        Commands::Operations(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(args: PublishArgs) -> Result<(), CliError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(args.execute())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_publish_flags() {
        let cli = Cli::try_parse_from([
            "helpdocs",
            "publish",
            "--dry-run",
            "-v",
            "--source-dir",
            "site/docs",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Publish(ref args) if args.verbose));
    }

    #[test]
    fn test_operations_takes_no_positional_arguments() {
        assert!(Cli::try_parse_from(["helpdocs", "operations", "extra"]).is_err());
    }
}
