//! `helpdocs publish` command implementation.

use std::path::PathBuf;

use clap::Args;
use helpdocs_config::{CliSettings, Config};
use helpdocs_zendesk::{PublishOptions, PublishPlan, PublishReport, Publisher, plan, read_tree};

use super::{help_center, require_zendesk};
use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Path to configuration file (default: auto-discover helpdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Help center locale (overrides config).
    #[arg(long, env = "HELPDOCS_LOCALE")]
    locale: Option<String>,

    /// Maximum number of API calls in flight (overrides config).
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Scan and render without contacting the help center.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the tree cannot be read,
    /// a category or section fails, or any article fails to publish.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            locale: self.locale,
            max_concurrent: self.max_concurrent,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let docs = &config.docs_resolved;

        output.info(&format!("Scanning {}...", docs.source_dir.display()));
        let tree = read_tree(&docs.source_dir, &docs.meta_name)?;

        if self.dry_run {
            let plan = plan(&tree)?;
            print_plan(&output, &plan);
            return Ok(());
        }

        let zendesk = require_zendesk(&config, &output)?;
        let publisher = Publisher::new(
            help_center(&config, zendesk)?,
            PublishOptions::from_config(zendesk, &config.publish),
        );

        output.info(&format!(
            "Publishing {} article(s) to {}...",
            tree.article_count(),
            zendesk.url
        ));
        let report = publisher.publish(&tree).await?;
        print_report(&output, &report);

        if report.is_success() {
            Ok(())
        } else {
            Err(CliError::ArticlesFailed(report.failures.len()))
        }
    }
}

fn print_plan(output: &Output, plan: &PublishPlan) {
    output.highlight("\n[DRY RUN] No changes made.");

    let mut current: Option<(&str, &str)> = None;
    for article in &plan.articles {
        let location = (article.category.as_str(), article.section.as_str());
        if current != Some(location) {
            output.info(&format!("\n{} / {}", location.0, location.1));
            current = Some(location);
        }
        output.info(&format!("  -> {} ({})", article.title, article.path.display()));
        for image in &article.images {
            output.info(&format!("       image: {}", image.display()));
        }
    }

    print_warnings(output, &plan.warnings);
    output.success(&format!("\n{} article(s) would be published.", plan.articles.len()));
}

fn print_report(output: &Output, report: &PublishReport) {
    output.separator();
    output.info(&format!(
        "Categories: {} created, {} updated",
        report.categories_created, report.categories_updated
    ));
    output.info(&format!(
        "Sections:   {} created, {} updated, {} access policies",
        report.sections_created, report.sections_updated, report.access_policies_updated
    ));
    output.info(&format!(
        "Articles:   {} created, {} updated, {} images uploaded",
        report.articles_created, report.articles_updated, report.attachments_uploaded
    ));

    print_warnings(output, &report.warnings);

    if report.is_success() {
        output.success("\nPublished successfully.");
    } else {
        let failures: Vec<String> = report
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.path.display(), f.message))
            .collect();
        output.list(Tone::Error, "Failed articles", &failures);
    }
}

fn print_warnings(output: &Output, warnings: &[String]) {
    output.list(Tone::Warning, "Warnings", warnings);
}
