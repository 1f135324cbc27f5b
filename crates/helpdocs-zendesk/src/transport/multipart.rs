//! Multipart form encoding for attachment uploads.

use std::path::{Path, PathBuf};

use rand::RngExt;

/// A `multipart/form-data` body: one file part plus text fields.
///
/// The file is read when the form is encoded, once per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    file: PathBuf,
    fields: Vec<(String, String)>,
}

/// Encoded multipart body with its content type.
#[derive(Debug)]
pub struct EncodedForm {
    /// `multipart/form-data; boundary=...`
    pub content_type: String,
    /// Encoded body.
    pub body: Vec<u8>,
}

impl MultipartForm {
    /// Create a form uploading `file` under the `file` part name.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            fields: Vec::new(),
        }
    }

    /// Add a text field. Values are always sent as text.
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Path of the file part.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Value of a text field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Read the file and encode the form.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub fn encode(&self) -> std::io::Result<EncodedForm> {
        let data = std::fs::read(&self.file)?;
        let filename = self
            .file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("attachment");
        let boundary = format!("----HelpdocsFormBoundary{:016x}", rand::rng().random::<u64>());

        let mut body = Vec::with_capacity(data.len() + 512);

        for (name, value) in &self.fields {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            );
            body.extend_from_slice(value.as_bytes());
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                escape_quoted(filename)
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!("Content-Type: {}\r\n\r\n", guess_content_type(filename)).as_bytes(),
        );
        body.extend_from_slice(&data);
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Ok(EncodedForm {
            content_type: format!("multipart/form-data; boundary={boundary}"),
            body,
        })
    }
}

/// Escape a quoted header parameter the way browsers encode form file names.
fn escape_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("%22"),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn guess_content_type(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
