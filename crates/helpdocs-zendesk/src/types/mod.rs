//! Help Center API types.
//!
//! Only fields that are actually used are modelled; serde ignores the rest.

mod attachment;
mod entities;

pub use attachment::{AttachmentEnvelope, AttachmentRecord};
pub use entities::{
    ArticleEnvelope, ArticleRecord, ArticlesResponse, CategoriesResponse, CategoryEnvelope,
    CategoryRecord, SectionEnvelope, SectionRecord, SectionsResponse,
};
