//! Document tree discovery.
//!
//! The source directory maps onto the help center hierarchy:
//!
//! ```text
//! docs/
//! ├── getting-started/          category
//! │   ├── meta.yaml
//! │   └── installation/         section
//! │       ├── meta.yaml
//! │       ├── linux.md          article
//! │       └── images/linux.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::error::PublishError;

/// Scanned source tree.
#[derive(Debug, Default)]
pub struct DocTree {
    /// Categories sorted by directory name.
    pub categories: Vec<CategoryNode>,
    /// Files ignored because of their location.
    pub warnings: Vec<String>,
}

impl DocTree {
    /// Total number of articles.
    #[must_use]
    pub fn article_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.sections)
            .map(|s| s.articles.len())
            .sum()
    }
}

/// Category directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    /// Directory path.
    pub path: PathBuf,
    /// Title and ordering.
    pub meta: NodeMeta,
    /// Sections sorted by directory name.
    pub sections: Vec<SectionNode>,
}

/// Section directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionNode {
    /// Directory path.
    pub path: PathBuf,
    /// Title and ordering.
    pub meta: NodeMeta,
    /// Access policy applied after the section is created or updated.
    pub access_policy: Option<AccessPolicy>,
    /// Markdown files sorted by name.
    pub articles: Vec<PathBuf>,
}

/// Title, description and position of a category or section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMeta {
    /// Title; the directory name unless overridden.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional position within the parent.
    pub position: Option<i64>,
}

/// Section visibility.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessPolicy {
    /// `everybody`, `signed_in_users` or `staff`.
    pub viewable_by: String,
    /// `staff` or `managers`.
    #[serde(default)]
    pub manageable_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MetaFile {
    title: Option<String>,
    description: Option<String>,
    position: Option<i64>,
    access_policy: Option<AccessPolicy>,
}

/// Scan `source_dir` for categories, sections and articles.
///
/// # Errors
///
/// Returns [`PublishError::InvalidTree`] if `source_dir` is not a directory,
/// [`PublishError::Yaml`] for a malformed metadata file, or an I/O error.
pub fn read_tree(source_dir: &Path, meta_name: &str) -> Result<DocTree, PublishError> {
    if !source_dir.is_dir() {
        return Err(PublishError::InvalidTree(format!(
            "{} is not a directory",
            source_dir.display()
        )));
    }

    let mut tree = DocTree::default();
    let (category_dirs, stray) = list_dir(source_dir, meta_name)?;
    warn_misplaced(&mut tree.warnings, &stray, "category directories");

    for category_dir in category_dirs {
        let meta = read_meta(&category_dir, meta_name)?;
        if meta.access_policy.is_some() {
            tree.warnings.push(format!(
                "{}: access_policy only applies to sections",
                category_dir.display()
            ));
        }

        let (section_dirs, stray) = list_dir(&category_dir, meta_name)?;
        warn_misplaced(&mut tree.warnings, &stray, "section directories");

        let mut sections = Vec::with_capacity(section_dirs.len());
        for section_dir in section_dirs {
            let section_meta = read_meta(&section_dir, meta_name)?;
            let (nested, articles) = list_dir(&section_dir, meta_name)?;
            for dir in nested.iter().filter(|d| contains_markdown(d)) {
                tree.warnings.push(format!(
                    "{}: nested directories inside a section are not published",
                    dir.display()
                ));
            }
            debug!(
                "Found section {} with {} article(s)",
                section_dir.display(),
                articles.len()
            );
            sections.push(SectionNode {
                meta: node_meta(&section_dir, &section_meta),
                access_policy: section_meta.access_policy,
                path: section_dir,
                articles,
            });
        }

        tree.categories.push(CategoryNode {
            meta: node_meta(&category_dir, &meta),
            path: category_dir,
            sections,
        });
    }

    Ok(tree)
}

/// Sorted visible subdirectories and Markdown files of `dir`.
fn list_dir(dir: &Path, meta_name: &str) -> Result<(Vec<PathBuf>, Vec<PathBuf>), PublishError> {
    let mut dirs = Vec::new();
    let mut markdown = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') || name == meta_name {
            continue;
        }

        let path = entry.path();
        if entry.file_type()?.is_dir() {
            dirs.push(path);
        } else if path.extension().is_some_and(|ext| ext == "md") {
            markdown.push(path);
        }
    }

    dirs.sort();
    markdown.sort();
    Ok((dirs, markdown))
}

/// Whether `dir` or any visible subdirectory holds a Markdown file.
fn contains_markdown(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries.filter_map(Result::ok).any(|entry| {
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            false
        } else if entry.file_type().is_ok_and(|t| t.is_dir()) {
            contains_markdown(&path)
        } else {
            path.extension().is_some_and(|ext| ext == "md")
        }
    })
}

fn read_meta(dir: &Path, meta_name: &str) -> Result<MetaFile, PublishError> {
    let path = dir.join(meta_name);
    if !path.is_file() {
        return Ok(MetaFile::default());
    }

    let content = fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(MetaFile::default());
    }
    serde_yaml::from_str(&content).map_err(|source| PublishError::Yaml { path, source })
}

fn node_meta(dir: &Path, meta: &MetaFile) -> NodeMeta {
    let title = meta
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| dir_name(dir));
    NodeMeta {
        title,
        description: meta.description.clone(),
        position: meta.position,
    }
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn warn_misplaced(warnings: &mut Vec<String>, files: &[PathBuf], expected: &str) {
    for file in files {
        warnings.push(format!(
            "{}: ignored, articles must live in section directories (expected {expected} here)",
            file.display()
        ));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_reads_three_levels() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "guides/meta.yaml", "title: User Guides\nposition: 2\n");
        write(
            root,
            "guides/setup/meta.yaml",
            "title: Setup\ndescription: |\n  Getting started\naccess_policy:\n  viewable_by: signed_in_users\n",
        );
        write(root, "guides/setup/b.md", "# B");
        write(root, "guides/setup/a.md", "# A");
        write(root, "guides/setup/image.png", "png");
        write(root, "guides/setup/img/diagram.png", "png");

        let tree = read_tree(root, "meta.yaml").unwrap();

        assert!(tree.warnings.is_empty(), "{:?}", tree.warnings);
        assert_eq!(tree.categories.len(), 1);
        let category = &tree.categories[0];
        assert_eq!(
            category.meta,
            NodeMeta {
                title: "User Guides".to_owned(),
                description: None,
                position: Some(2),
            }
        );
        let section = &category.sections[0];
        assert_eq!(section.meta.title, "Setup");
        assert_eq!(section.meta.description.as_deref(), Some("Getting started\n"));
        assert_eq!(
            section.access_policy,
            Some(AccessPolicy {
                viewable_by: "signed_in_users".to_owned(),
                manageable_by: None,
            })
        );
        assert_eq!(
            section.articles,
            vec![root.join("guides/setup/a.md"), root.join("guides/setup/b.md")]
        );
        assert_eq!(tree.article_count(), 2);
    }

    #[test]
    fn test_titles_default_to_directory_names() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "faq/billing/refunds.md", "Refunds");
        write(temp.path(), "faq/meta.yaml", "");

        let tree = read_tree(temp.path(), "meta.yaml").unwrap();

        assert_eq!(tree.categories[0].meta.title, "faq");
        assert_eq!(tree.categories[0].sections[0].meta.title, "billing");
    }

    #[test]
    fn test_sorted_and_hidden_skipped() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "zeta/s/a.md", "");
        write(temp.path(), "alpha/s/a.md", "");
        write(temp.path(), ".git/s/a.md", "");
        write(temp.path(), "alpha/s/.draft.md", "");

        let tree = read_tree(temp.path(), "meta.yaml").unwrap();

        let titles: Vec<_> = tree.categories.iter().map(|c| c.meta.title.as_str()).collect();
        assert_eq!(titles, vec!["alpha", "zeta"]);
        assert_eq!(tree.categories[0].sections[0].articles.len(), 1);
    }

    #[test]
    fn test_misplaced_markdown_is_warned() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "README.md", "");
        write(temp.path(), "guides/overview.md", "");
        write(temp.path(), "guides/setup/deep/x.md", "");
        write(temp.path(), "guides/setup/a.md", "");

        let tree = read_tree(temp.path(), "meta.yaml").unwrap();

        assert_eq!(tree.warnings.len(), 3, "{:?}", tree.warnings);
        assert!(tree.warnings[0].contains("README.md"));
        assert!(tree.warnings[1].contains("overview.md"));
        assert!(tree.warnings[2].contains("nested directories"));
        assert_eq!(tree.article_count(), 1);
    }

    #[test]
    fn test_custom_meta_name() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "c/_meta.yml", "title: Custom");
        write(temp.path(), "c/s/a.md", "");

        let tree = read_tree(temp.path(), "_meta.yml").unwrap();

        assert_eq!(tree.categories[0].meta.title, "Custom");
    }

    #[test]
    fn test_malformed_meta_is_error() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "c/meta.yaml", "title: [unclosed");

        let err = read_tree(temp.path(), "meta.yaml").unwrap_err();

        assert!(matches!(err, PublishError::Yaml { .. }));
    }

    #[test]
    fn test_missing_source_dir_is_error() {
        let temp = tempfile::tempdir().unwrap();

        let err = read_tree(&temp.path().join("nope"), "meta.yaml").unwrap_err();

        assert!(matches!(err, PublishError::InvalidTree(_)));
    }
}
