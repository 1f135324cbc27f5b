//! Markdown tree publisher.
//!
//! Publishes a directory tree of Markdown files to a help center:
//!
//! 1. Scan `source_dir/<category>/<section>/<article>.md` ([`read_tree`])
//! 2. Create or update categories and sections by name
//! 3. Render each article, taking the title from its first H1
//! 4. Create the article or update its translation by title
//! 5. Upload local images as inline attachments and rewrite their URLs
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use helpdocs_config::Config;
//! use helpdocs_zendesk::{HelpCenter, HttpTransport, PublishOptions, Publisher, read_tree};
//!
//! let config = Config::load(None, None)?;
//! let zendesk = config.require_zendesk()?;
//! let help_center = HelpCenter::builder()
//!     .transport(HttpTransport::from_config(zendesk)?)
//!     .build()?;
//!
//! let tree = read_tree(Path::new("docs"), "meta.yaml")?;
//! let publisher = Publisher::new(help_center, PublishOptions::from_config(zendesk, &config.publish));
//! let report = publisher.publish(&tree).await?;
//! println!("{} article(s) created", report.articles_created);
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod render;
mod result;
mod tree;

pub use error::PublishError;
pub use executor::{PublishOptions, Publisher, plan};
pub use render::{RenderedArticle, render, render_with};
pub use result::{ArticleFailure, PlannedArticle, PublishPlan, PublishReport};
pub use tree::{AccessPolicy, CategoryNode, DocTree, NodeMeta, SectionNode, read_tree};
