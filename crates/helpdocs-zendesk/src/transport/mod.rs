//! Transport seam between the dispatcher and the Help Center API.
//!
//! A [`Transport`] performs exactly one physical exchange per call and
//! reports the result as a [`RawOutcome`]. Classification and retries are
//! the dispatcher's job.

mod http;
mod multipart;

use std::fmt;
use std::future::Future;

pub use http::HttpTransport;
pub use multipart::{EncodedForm, MultipartForm};

use crate::error::ZendeskError;
use crate::surface::Resource;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON document.
    Json(serde_json::Value),
    /// Multipart form with a file part.
    Multipart(MultipartForm),
}

/// A fully resolved API request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Resource kind the operation belongs to.
    pub resource: Resource,
    /// Operation name within the resource.
    pub operation: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Endpoint relative to the API base URL.
    pub endpoint: String,
    /// Optional body.
    pub payload: Option<Payload>,
}

/// Status, headers and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers as (name, value) pairs.
    pub headers: Vec<(String, String)>,
    /// Raw response body.
    pub body: String,
}

impl Response {
    /// Create a response without headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as JSON; an empty body yields `null`.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::Json`] if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, ZendeskError> {
        if self.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Result of one physical attempt: transport error, response, or both.
#[derive(Debug)]
pub struct RawOutcome {
    /// Transport-level error, if the exchange failed.
    pub error: Option<ZendeskError>,
    /// Response, if one was received.
    pub response: Option<Response>,
}

impl RawOutcome {
    /// Outcome with a response and no transport error.
    #[must_use]
    pub fn response(response: Response) -> Self {
        Self {
            error: None,
            response: Some(response),
        }
    }

    /// Outcome of a failed exchange with no response.
    #[must_use]
    pub fn failed(error: ZendeskError) -> Self {
        Self {
            error: Some(error),
            response: None,
        }
    }
}

/// Performs physical API calls.
///
/// `call` must produce exactly one outcome per invocation and never retry on
/// its own.
pub trait Transport: Send + Sync + 'static {
    /// Whether the transport offers operations for `resource`.
    fn supports(&self, resource: Resource) -> bool {
        let _ = resource;
        true
    }

    /// Perform one exchange.
    fn call(&self, request: &ApiRequest) -> impl Future<Output = RawOutcome> + Send;
}
