//! Publish outcomes.

use std::path::PathBuf;

/// Counts of what a publish run changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Categories created.
    pub categories_created: usize,
    /// Existing categories updated.
    pub categories_updated: usize,
    /// Sections created.
    pub sections_created: usize,
    /// Existing sections updated.
    pub sections_updated: usize,
    /// Section access policies updated.
    pub access_policies_updated: usize,
    /// Articles created.
    pub articles_created: usize,
    /// Existing articles whose translation was updated.
    pub articles_updated: usize,
    /// Images uploaded as inline attachments.
    pub attachments_uploaded: usize,
    /// Articles that could not be published.
    pub failures: Vec<ArticleFailure>,
    /// Non-fatal problems (missing images, misplaced files).
    pub warnings: Vec<String>,
}

impl PublishReport {
    /// Whether every article was published.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// An article that failed to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFailure {
    /// Markdown source.
    pub path: PathBuf,
    /// Error message.
    pub message: String,
}

/// What a publish run would do, computed without remote calls.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishPlan {
    /// Articles in publishing order.
    pub articles: Vec<PlannedArticle>,
    /// Non-fatal problems found while scanning and rendering.
    pub warnings: Vec<String>,
}

/// One article of a [`PublishPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedArticle {
    /// Category title.
    pub category: String,
    /// Section title.
    pub section: String,
    /// Article title.
    pub title: String,
    /// Markdown source.
    pub path: PathBuf,
    /// Local images that would be uploaded.
    pub images: Vec<PathBuf>,
}
