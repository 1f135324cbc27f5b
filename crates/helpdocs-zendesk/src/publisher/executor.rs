//! Publisher implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use helpdocs_config::{PublishConfig, ZendeskConfig};

use super::error::PublishError;
use super::render::{render, render_with};
use super::result::{ArticleFailure, PlannedArticle, PublishPlan, PublishReport};
use super::tree::{CategoryNode, DocTree, NodeMeta, SectionNode};
use crate::surface::{HelpCenter, Resource};
use crate::transport::Transport;
use crate::types::{
    ArticleEnvelope, ArticlesResponse, CategoriesResponse, CategoryEnvelope, CategoryRecord,
    SectionEnvelope, SectionRecord, SectionsResponse,
};

/// Settings applied to everything a [`Publisher`] creates or updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    /// Locale of created entities and updated translations.
    pub locale: String,
    /// Permission group of created articles.
    pub permission_group_id: Option<u64>,
    /// User segment of created articles; `None` means visible to everyone.
    pub user_segment_id: Option<u64>,
    /// Notify followers when an article is created.
    pub notify_subscribers: bool,
}

impl PublishOptions {
    /// Options from the `[zendesk]` and `[publish]` config sections.
    #[must_use]
    pub fn from_config(zendesk: &ZendeskConfig, publish: &PublishConfig) -> Self {
        Self {
            locale: zendesk.locale.clone(),
            permission_group_id: publish.permission_group_id,
            user_segment_id: publish.user_segment_id,
            notify_subscribers: publish.notify_subscribers,
        }
    }
}

/// Result of publishing one article.
struct ArticleOutcome {
    created: bool,
    attachments: usize,
    warnings: Vec<String>,
}

/// Publishes a [`DocTree`] to a help center.
pub struct Publisher<T> {
    help_center: HelpCenter<T>,
    options: PublishOptions,
}

impl<T: Transport> Publisher<T> {
    /// Create a publisher.
    #[must_use]
    pub fn new(help_center: HelpCenter<T>, options: PublishOptions) -> Self {
        Self {
            help_center,
            options,
        }
    }

    /// Publish `tree`, reconciling by category name, section name and
    /// article title.
    ///
    /// Categories and sections are processed in order; the articles of a
    /// section are published concurrently. A failed article is recorded in
    /// the report and does not stop the run.
    ///
    /// # Errors
    ///
    /// Returns an error if a category, section or access policy cannot be
    /// synchronized.
    pub async fn publish(&self, tree: &DocTree) -> Result<PublishReport, PublishError> {
        let mut report = PublishReport {
            warnings: tree.warnings.clone(),
            ..PublishReport::default()
        };
        if tree.categories.is_empty() {
            return Ok(report);
        }

        let categories = self.help_center.resource(Resource::Categories)?;
        let existing: CategoriesResponse = parse(categories.call("list", &[]).await?)?;

        for category in &tree.categories {
            self.publish_category(category, &existing.categories, &mut report)
                .await?;
        }

        Ok(report)
    }

    async fn publish_category(
        &self,
        category: &CategoryNode,
        existing: &[CategoryRecord],
        report: &mut PublishReport,
    ) -> Result<(), PublishError> {
        let categories = self.help_center.resource(Resource::Categories)?;
        let fields = self.node_fields(&category.meta);

        let (category_id, created) = match existing.iter().find(|c| c.name == category.meta.title) {
            Some(record) => {
                categories
                    .call("update", &[json!(record.id), json!({ "category": fields })])
                    .await?;
                report.categories_updated += 1;
                (record.id, false)
            }
            None => {
                let envelope: CategoryEnvelope = parse(
                    categories
                        .call("create", &[json!({ "category": fields })])
                        .await?,
                )?;
                info!(
                    "Created category '{}' (id={})",
                    category.meta.title, envelope.category.id
                );
                report.categories_created += 1;
                (envelope.category.id, true)
            }
        };

        let existing_sections = if created {
            Vec::new()
        } else {
            let sections = self.help_center.resource(Resource::Sections)?;
            let listed: SectionsResponse = parse(
                sections
                    .call("list_by_category", &[json!(category_id)])
                    .await?,
            )?;
            listed.sections
        };

        for section in &category.sections {
            self.publish_section(category_id, section, &existing_sections, report)
                .await?;
        }
        Ok(())
    }

    async fn publish_section(
        &self,
        category_id: u64,
        section: &SectionNode,
        existing: &[SectionRecord],
        report: &mut PublishReport,
    ) -> Result<(), PublishError> {
        let sections = self.help_center.resource(Resource::Sections)?;
        let fields = self.node_fields(&section.meta);

        let (section_id, created) = match existing.iter().find(|s| s.name == section.meta.title) {
            Some(record) => {
                sections
                    .call("update", &[json!(record.id), json!({ "section": fields })])
                    .await?;
                report.sections_updated += 1;
                (record.id, false)
            }
            None => {
                let envelope: SectionEnvelope = parse(
                    sections
                        .call("create", &[json!(category_id), json!({ "section": fields })])
                        .await?,
                )?;
                info!(
                    "Created section '{}' (id={})",
                    section.meta.title, envelope.section.id
                );
                report.sections_created += 1;
                (envelope.section.id, true)
            }
        };

        if let Some(policy) = &section.access_policy {
            let mut access_policy = Map::new();
            access_policy.insert("viewable_by".to_owned(), json!(policy.viewable_by));
            if let Some(manageable_by) = &policy.manageable_by {
                access_policy.insert("manageable_by".to_owned(), json!(manageable_by));
            }
            self.help_center
                .resource(Resource::AccessPolicies)?
                .call(
                    "update",
                    &[json!(section_id), json!({ "access_policy": access_policy })],
                )
                .await?;
            report.access_policies_updated += 1;
        }

        let existing_articles: HashMap<String, u64> = if created {
            HashMap::new()
        } else {
            let listed: ArticlesResponse = parse(
                self.help_center
                    .resource(Resource::Articles)?
                    .call("list_by_section", &[json!(section_id)])
                    .await?,
            )?;
            listed
                .articles
                .into_iter()
                .map(|a| (a.title, a.id))
                .collect()
        };

        let results = join_all(
            section
                .articles
                .iter()
                .map(|path| self.publish_article(section_id, &existing_articles, path)),
        )
        .await;

        for (path, result) in section.articles.iter().zip(results) {
            match result {
                Ok(outcome) => {
                    if outcome.created {
                        report.articles_created += 1;
                    } else {
                        report.articles_updated += 1;
                    }
                    report.attachments_uploaded += outcome.attachments;
                    report.warnings.extend(outcome.warnings);
                }
                Err(e) => {
                    warn!("Failed to publish {}: {e}", path.display());
                    report.failures.push(ArticleFailure {
                        path: path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    async fn publish_article(
        &self,
        section_id: u64,
        existing: &HashMap<String, u64>,
        path: &Path,
    ) -> Result<ArticleOutcome, PublishError> {
        let markdown = std::fs::read_to_string(path)?;
        let rendered = render(&markdown);
        let title = rendered.title.clone().unwrap_or_else(|| file_stem(path));
        let translations = self.help_center.resource(Resource::Translations)?;
        let locale = self.options.locale.as_str();

        let (article_id, created) = if let Some(&id) = existing.get(&title) {
            translations
                .call(
                    "update_for_article",
                    &[
                        json!(id),
                        json!(locale),
                        json!({ "translation": { "title": title, "body": rendered.html } }),
                    ],
                )
                .await?;
            info!("Updated article '{title}' (id={id})");
            (id, false)
        } else {
            let envelope: ArticleEnvelope = parse(
                self.help_center
                    .resource(Resource::Articles)?
                    .call(
                        "create",
                        &[json!(section_id), self.article_body(&title, &rendered.html)],
                    )
                    .await?,
            )?;
            info!("Created article '{title}' (id={})", envelope.article.id);
            (envelope.article.id, true)
        };

        let (images, warnings) = resolve_images(path, &rendered.images);
        if images.is_empty() {
            return Ok(ArticleOutcome {
                created,
                attachments: 0,
                warnings,
            });
        }

        let attachments = self.help_center.attachments()?;
        let uploads = join_all(
            images
                .iter()
                .map(|(_, file)| attachments.create(article_id, file)),
        )
        .await;

        let mut urls = HashMap::with_capacity(images.len());
        for ((reference, _), upload) in images.iter().zip(uploads) {
            urls.insert(reference.clone(), upload?.content_url);
        }

        let body = render_with(&markdown, &urls).html;
        translations
            .call(
                "update_for_article",
                &[
                    json!(article_id),
                    json!(locale),
                    json!({ "translation": { "body": body } }),
                ],
            )
            .await?;

        Ok(ArticleOutcome {
            created,
            attachments: urls.len(),
            warnings,
        })
    }

    /// `name`, `description`, `position` and `locale` of a category or section.
    fn node_fields(&self, meta: &NodeMeta) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("name".to_owned(), json!(meta.title));
        fields.insert("locale".to_owned(), json!(self.options.locale));
        if let Some(description) = &meta.description {
            fields.insert("description".to_owned(), json!(description));
        }
        if let Some(position) = meta.position {
            fields.insert("position".to_owned(), json!(position));
        }
        fields
    }

    fn article_body(&self, title: &str, html: &str) -> Value {
        let mut article = Map::new();
        article.insert("title".to_owned(), json!(title));
        article.insert("body".to_owned(), json!(html));
        article.insert("locale".to_owned(), json!(self.options.locale));
        article.insert("user_segment_id".to_owned(), json!(self.options.user_segment_id));
        if let Some(group) = self.options.permission_group_id {
            article.insert("permission_group_id".to_owned(), json!(group));
        }
        json!({
            "article": article,
            "notify_subscribers": self.options.notify_subscribers,
        })
    }
}

/// Scan and render `tree` without contacting the help center.
///
/// # Errors
///
/// Returns an I/O error if an article cannot be read.
pub fn plan(tree: &DocTree) -> Result<PublishPlan, PublishError> {
    let mut plan = PublishPlan {
        warnings: tree.warnings.clone(),
        ..PublishPlan::default()
    };

    for category in &tree.categories {
        for section in &category.sections {
            for path in &section.articles {
                let rendered = render(&std::fs::read_to_string(path)?);
                let (images, warnings) = resolve_images(path, &rendered.images);
                plan.warnings.extend(warnings);
                plan.articles.push(PlannedArticle {
                    category: category.meta.title.clone(),
                    section: section.meta.title.clone(),
                    title: rendered.title.unwrap_or_else(|| file_stem(path)),
                    path: path.clone(),
                    images: images.into_iter().map(|(_, file)| file).collect(),
                });
            }
        }
    }

    Ok(plan)
}

fn parse<D: DeserializeOwned>(value: Value) -> Result<D, PublishError> {
    Ok(serde_json::from_value(value)?)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Map image references to files next to `article`.
///
/// Returns `(reference, file)` pairs for existing files and a warning for
/// each missing one.
fn resolve_images(article: &Path, references: &[String]) -> (Vec<(String, PathBuf)>, Vec<String>) {
    let dir = article.parent().unwrap_or(Path::new("."));
    let mut found = Vec::with_capacity(references.len());
    let mut warnings = Vec::new();

    for reference in references {
        let relative = reference
            .split(['?', '#'])
            .next()
            .unwrap_or(reference.as_str());
        let file = dir.join(&*percent_decode_str(relative).decode_utf8_lossy());
        if file.is_file() {
            found.push((reference.clone(), file));
        } else {
            warnings.push(format!(
                "{}: image '{reference}' not found",
                article.display()
            ));
        }
    }

    (found, warnings)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::publisher::tree::read_tree;
    use crate::testing::MockTransport;
    use crate::transport::{ApiRequest, Method, Payload, RawOutcome, Response};

    const UPLOADED: &str = "https://acme.zendesk.com/hc/article_attachments/9/flow.png";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn options() -> PublishOptions {
        PublishOptions {
            locale: "en-us".to_owned(),
            permission_group_id: Some(3),
            user_segment_id: None,
            notify_subscribers: false,
        }
    }

    fn ok(status: u16, body: &str) -> RawOutcome {
        RawOutcome::response(Response::new(status, body))
    }

    fn json_body(request: &ApiRequest) -> &Value {
        match &request.payload {
            Some(Payload::Json(body)) => body,
            other => panic!("expected JSON payload, got {other:?}"),
        }
    }

    fn fixture() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(root, "guides/meta.yaml", "title: Guides\n");
        write(
            root,
            "guides/setup/meta.yaml",
            "access_policy:\n  viewable_by: staff\n",
        );
        write(
            root,
            "guides/setup/install.md",
            "# Install\n\n![flow](img/flow.png)\n",
        );
        write(root, "guides/setup/img/flow.png", "png");
        write(root, "guides/setup/faq.md", "No heading\n\n![gone](missing.png)\n");
        temp
    }

    /// Help center with one existing category and nothing else.
    fn new_site(request: &ApiRequest) -> RawOutcome {
        match (request.method, request.endpoint.as_str()) {
            (Method::Get, "/categories.json?per_page=100") => {
                ok(200, r#"{"categories":[{"id":1,"name":"Guides"}]}"#)
            }
            (Method::Put, "/categories/1.json") => ok(200, r#"{"category":{"id":1,"name":"Guides"}}"#),
            (Method::Get, "/categories/1/sections.json?per_page=100") => ok(200, r#"{"sections":[]}"#),
            (Method::Post, "/categories/1/sections.json") => {
                ok(201, r#"{"section":{"id":10,"name":"setup"}}"#)
            }
            (Method::Put, "/sections/10/access_policy.json") => ok(200, "{}"),
            (Method::Post, "/sections/10/articles.json") => {
                let title = json_body(request)["article"]["title"].as_str().unwrap();
                let id = if title == "Install" { 100 } else { 101 };
                ok(201, &format!(r#"{{"article":{{"id":{id},"title":"{title}"}}}}"#))
            }
            (Method::Post, "/articles/100/attachments.json") => ok(
                201,
                &format!(
                    r#"{{"article_attachment":{{"id":9,"file_name":"flow.png","content_url":"{UPLOADED}","inline":true}}}}"#
                ),
            ),
            (Method::Put, "/articles/100/translations/en-us.json") => ok(200, "{}"),
            (method, endpoint) => panic!("unexpected call {method} {endpoint}"),
        }
    }

    #[tokio::test]
    async fn test_publishes_new_sections_and_articles() {
        let temp = fixture();
        let tree = read_tree(temp.path(), "meta.yaml").unwrap();
        let transport = MockTransport::new();
        transport.route(new_site);
        let hc = HelpCenter::builder().transport(transport).build().unwrap();
        let publisher = Publisher::new(hc.clone(), options());

        let report = publisher.publish(&tree).await.unwrap();

        assert_eq!(report.categories_updated, 1);
        assert_eq!(report.categories_created, 0);
        assert_eq!(report.sections_created, 1);
        assert_eq!(report.access_policies_updated, 1);
        assert_eq!(report.articles_created, 2);
        assert_eq!(report.attachments_uploaded, 1);
        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("missing.png"));

        let requests = hc.dispatcher().transport().requests();
        let create = requests
            .iter()
            .find(|r| r.endpoint == "/sections/10/articles.json")
            .unwrap();
        let body = json_body(create);
        assert_eq!(body["article"]["permission_group_id"], 3);
        assert_eq!(body["article"]["user_segment_id"], Value::Null);
        assert_eq!(body["article"]["locale"], "en-us");
        assert_eq!(body["notify_subscribers"], false);

        let policy = requests
            .iter()
            .find(|r| r.endpoint == "/sections/10/access_policy.json")
            .unwrap();
        assert_eq!(
            json_body(policy),
            &json!({"access_policy": {"viewable_by": "staff"}})
        );

        let rewrite = requests
            .iter()
            .find(|r| r.endpoint == "/articles/100/translations/en-us.json")
            .unwrap();
        let html = json_body(rewrite)["translation"]["body"].as_str().unwrap();
        assert!(html.contains(UPLOADED), "{html}");
        assert!(!html.contains("img/flow.png"));
    }

    #[tokio::test]
    async fn test_existing_articles_are_updated_and_failures_recorded() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "Guides/setup/a.md", "# Alpha\n\nText");
        write(temp.path(), "Guides/setup/b.md", "# Beta\n\nText");
        let tree = read_tree(temp.path(), "meta.yaml").unwrap();

        let updates = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&updates);
        let transport = MockTransport::new();
        transport.route(move |request| match (request.method, request.endpoint.as_str()) {
            (Method::Get, "/categories.json?per_page=100") => {
                ok(200, r#"{"categories":[{"id":1,"name":"Guides"}]}"#)
            }
            (Method::Get, "/categories/1/sections.json?per_page=100") => {
                ok(200, r#"{"sections":[{"id":10,"name":"setup","category_id":1}]}"#)
            }
            (Method::Get, "/sections/10/articles.json?per_page=100") => ok(
                200,
                r#"{"articles":[{"id":100,"title":"Alpha"},{"id":101,"title":"Beta"}]}"#,
            ),
            (Method::Put, "/articles/100/translations/en-us.json") => {
                seen.lock().unwrap().push(json_body(request).clone());
                ok(200, "{}")
            }
            (Method::Put, "/articles/101/translations/en-us.json") => ok(422, "invalid"),
            _ => ok(200, "{}"),
        });
        let hc = HelpCenter::builder()
            .transport(transport)
            .max_retries(0)
            .build()
            .unwrap();

        let report = Publisher::new(hc, options()).publish(&tree).await.unwrap();

        assert_eq!(report.categories_updated, 1);
        assert_eq!(report.sections_updated, 1);
        assert_eq!(report.articles_updated, 1);
        assert_eq!(report.articles_created, 0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, temp.path().join("Guides/setup/b.md"));
        assert!(report.failures[0].message.contains("422"));
        assert_eq!(
            *updates.lock().unwrap(),
            vec![json!({"translation": {"title": "Alpha", "body": "<p>Text</p>\n"}})]
        );
    }

    #[tokio::test]
    async fn test_category_failure_aborts() {
        let temp = fixture();
        let tree = read_tree(temp.path(), "meta.yaml").unwrap();
        let transport = MockTransport::new();
        transport.respond(|_| ok(403, "forbidden"));
        let hc = HelpCenter::builder().transport(transport).build().unwrap();

        let err = Publisher::new(hc, options()).publish(&tree).await.unwrap_err();

        assert!(matches!(err, PublishError::Zendesk(ref e) if e.status() == Some(403)));
    }

    #[tokio::test]
    async fn test_empty_tree_makes_no_calls() {
        let hc = HelpCenter::builder()
            .transport(MockTransport::new())
            .build()
            .unwrap();

        let report = Publisher::new(hc.clone(), options())
            .publish(&DocTree::default())
            .await
            .unwrap();

        assert_eq!(report, PublishReport::default());
        assert_eq!(hc.dispatcher().transport().calls(), 0);
    }

    #[test]
    fn test_plan_renders_without_remote_calls() {
        let temp = fixture();
        let tree = read_tree(temp.path(), "meta.yaml").unwrap();

        let plan = plan(&tree).unwrap();

        let titles: Vec<_> = plan.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["faq", "Install"]);
        assert_eq!(plan.articles[0].category, "Guides");
        assert_eq!(plan.articles[0].section, "setup");
        assert_eq!(
            plan.articles[1].images,
            vec![temp.path().join("guides/setup/img/flow.png")]
        );
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_image_references_are_decoded() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "s/my image.png", "png");
        let article = temp.path().join("s/a.md");

        let (found, warnings) = resolve_images(
            &article,
            &["my%20image.png?v=2".to_owned(), "nope.png".to_owned()],
        );

        assert_eq!(
            found,
            vec![("my%20image.png?v=2".to_owned(), temp.path().join("s/my image.png"))]
        );
        assert_eq!(warnings.len(), 1);
    }
}
