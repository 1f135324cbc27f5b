//! Article attachment types.

use serde::{Deserialize, Serialize};

/// Attachment record returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttachmentRecord {
    /// Attachment ID.
    pub id: u64,
    /// Stored file name.
    pub file_name: String,
    /// Public URL of the uploaded file.
    pub content_url: String,
    /// MIME type detected by the server.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// Whether the attachment is inline (not listed under the article).
    #[serde(default)]
    pub inline: bool,
}

/// `{"article_attachment": {...}}` response body.
#[derive(Debug, Deserialize)]
pub struct AttachmentEnvelope {
    /// The created attachment, absent on malformed responses.
    #[serde(default)]
    pub article_attachment: Option<AttachmentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default() {
        let record: AttachmentRecord = serde_json::from_str(
            r#"{"id":1,"file_name":"a.png","content_url":"https://x/a.png","url":"ignored"}"#,
        )
        .unwrap();
        assert_eq!(record.content_type, None);
        assert_eq!(record.size, None);
        assert!(!record.inline);
    }

    #[test]
    fn test_envelope_without_record() {
        let envelope: AttachmentEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.article_attachment.is_none());
    }
}
