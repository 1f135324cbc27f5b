//! Normalization of raw transport outcomes into failures.

use std::time::Duration;

use crate::error::ZendeskError;
use crate::transport::{RawOutcome, Response};

/// Header carrying the server's rate-limit hint, in seconds.
const RETRY_AFTER_HEADER: &str = "retry-after";

/// Normalized description of a failed attempt.
#[derive(Debug)]
pub struct Failure {
    /// HTTP status code, if a response was received.
    pub status: Option<u16>,
    /// Server-provided delay before retrying.
    pub retry_after: Option<Duration>,
    /// Underlying error.
    pub cause: ZendeskError,
}

impl Failure {
    /// A failure is transient when the server asked for a delay or failed with 5xx.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.retry_after.is_some() || self.status.is_some_and(|s| s >= 500)
    }
}

/// Outcome of classifying one attempt.
#[derive(Debug)]
pub enum Classified {
    /// The call succeeded.
    Success(Response),
    /// The call failed.
    Failure(Failure),
}

/// Classify a raw outcome.
///
/// A transport error always wins over the response; a response with status
/// 400 or above becomes an [`ZendeskError::HttpResponse`] failure. A
/// `Retry-After` hint on the response is attached to any failure.
#[must_use]
pub fn classify(outcome: RawOutcome) -> Classified {
    let RawOutcome { error, response } = outcome;
    let status = response.as_ref().map(|r| r.status);
    let retry_after = response.as_ref().and_then(retry_after);

    let cause = match (error, response) {
        (Some(error), _) => error,
        (None, Some(response)) if response.status >= 400 => ZendeskError::HttpResponse {
            status: response.status,
            body: response.body,
        },
        (None, Some(response)) => return Classified::Success(response),
        (None, None) => ZendeskError::NoResponse,
    };

    Classified::Failure(Failure {
        status,
        retry_after,
        cause,
    })
}

/// Parse the `Retry-After` header as (possibly fractional) seconds.
fn retry_after(response: &Response) -> Option<Duration> {
    let seconds: f64 = response.header(RETRY_AFTER_HEADER)?.trim().parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}
