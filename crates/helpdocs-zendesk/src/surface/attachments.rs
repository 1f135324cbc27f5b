//! Article attachment upload.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use super::{Operations, Resource};
use crate::error::ZendeskError;
use crate::transport::{ApiRequest, Method, MultipartForm, Payload, Transport};
use crate::types::{AttachmentEnvelope, AttachmentRecord};

/// Article attachment operations.
///
/// Registry operations (`list`, `show`, `delete`) are available through
/// [`Attachments::operations`]; uploads go through [`Attachments::create`].
pub struct Attachments<'a, T> {
    operations: Operations<'a, T>,
}

impl<'a, T: Transport> Attachments<'a, T> {
    pub(super) fn new(operations: Operations<'a, T>) -> Self {
        Self { operations }
    }

    /// Registry operations of the attachment resource.
    pub fn operations(&self) -> &Operations<'a, T> {
        &self.operations
    }

    /// Upload `path` as an inline attachment of article `article_id`.
    ///
    /// The file is read on every attempt, so retries resend the full body.
    ///
    /// # Errors
    ///
    /// Returns the dispatcher's final error, or
    /// [`ZendeskError::UnexpectedResponse`] if the response carries no
    /// attachment record.
    pub async fn create(
        &self,
        article_id: u64,
        path: &Path,
    ) -> Result<AttachmentRecord, ZendeskError> {
        info!("Uploading attachment {} to article {article_id}", path.display());

        let request = ApiRequest {
            resource: Resource::ArticleAttachments,
            operation: "create",
            method: Method::Post,
            endpoint: format!("/articles/{article_id}/attachments.json"),
            payload: Some(Payload::Multipart(
                MultipartForm::new(path).text("inline", "true"),
            )),
        };

        let response = self.operations.dispatcher.dispatch(request).await?;
        let envelope: AttachmentEnvelope = serde_json::from_str(&response.body)?;
        envelope.article_attachment.ok_or_else(|| {
            ZendeskError::UnexpectedResponse(format!(
                "attachment upload for article {article_id} returned no article_attachment"
            ))
        })
    }

    /// `create` with positional arguments `[article_id, path]`.
    pub(super) async fn create_from_args(&self, args: &[Value]) -> Result<Value, ZendeskError> {
        let invalid = |message: &str| ZendeskError::InvalidArguments {
            resource: Resource::ArticleAttachments,
            operation: "create",
            message: message.to_owned(),
        };

        let [article_id, path] = args else {
            return Err(invalid("expected 2 argument(s): article id and file path"));
        };
        let article_id = article_id
            .as_u64()
            .ok_or_else(|| invalid("article id must be a non-negative integer"))?;
        let path = path
            .as_str()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| invalid("file path must be a non-empty string"))?;

        let record = self.create(article_id, Path::new(path)).await?;
        Ok(serde_json::to_value(record)?)
    }
}
