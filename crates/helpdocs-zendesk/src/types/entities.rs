//! Categories, sections and articles.

use serde::Deserialize;

/// Help Center category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    /// Category ID.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// Help Center section.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionRecord {
    /// Section ID.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Parent category.
    #[serde(default)]
    pub category_id: Option<u64>,
}

/// Help Center article.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRecord {
    /// Article ID.
    pub id: u64,
    /// Title in the article's source locale.
    pub title: String,
    /// Source locale.
    #[serde(default)]
    pub locale: Option<String>,
}

/// `GET /categories.json`
#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    /// First page of categories.
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
}

/// `{"category": {...}}`
#[derive(Debug, Deserialize)]
pub struct CategoryEnvelope {
    /// The category.
    pub category: CategoryRecord,
}

/// `GET /categories/{id}/sections.json`
#[derive(Debug, Deserialize)]
pub struct SectionsResponse {
    /// First page of sections.
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
}

/// `{"section": {...}}`
#[derive(Debug, Deserialize)]
pub struct SectionEnvelope {
    /// The section.
    pub section: SectionRecord,
}

/// `GET /sections/{id}/articles.json`
#[derive(Debug, Deserialize)]
pub struct ArticlesResponse {
    /// First page of articles.
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
}

/// `{"article": {...}}`
#[derive(Debug, Deserialize)]
pub struct ArticleEnvelope {
    /// The article.
    pub article: ArticleRecord,
}
