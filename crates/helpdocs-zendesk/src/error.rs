//! Error types for Zendesk Help Center integration.

use crate::surface::Resource;

/// Error from Help Center API operations.
#[derive(Debug, thiserror::Error)]
pub enum ZendeskError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Transport finished without an error and without a response.
    #[error("transport returned no response")]
    NoResponse,

    /// Response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Help center was built without a transport.
    #[error("a transport is required to build the help center client")]
    MissingTransport,

    /// Invalid client settings or credentials.
    #[error("configuration error: {0}")]
    Config(String),

    /// Resource kind not offered by the transport.
    #[error("resource '{0}' is not supported by the transport")]
    UnsupportedResource(Resource),

    /// Operation name not present in the registry for the resource.
    #[error("unknown operation '{resource}.{operation}'")]
    UnknownOperation {
        /// Resource kind.
        resource: Resource,
        /// Requested operation name.
        operation: String,
    },

    /// Arguments do not match the operation's signature.
    #[error("invalid arguments for '{resource}.{operation}': {message}")]
    InvalidArguments {
        /// Resource kind.
        resource: Resource,
        /// Operation name.
        operation: &'static str,
        /// What was wrong.
        message: String,
    },

    /// A background task failed: the blocking HTTP exchange panicked or was
    /// cancelled, or a queue slot could not be acquired.
    #[error("task failed: {0}")]
    Task(String),
}

impl ZendeskError {
    /// HTTP status code carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}
