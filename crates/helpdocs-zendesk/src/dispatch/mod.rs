//! Resilient dispatch of API calls.
//!
//! Every call goes through a [`Dispatcher`], which
//!
//! 1. waits for a slot in its [`WorkQueue`],
//! 2. performs the call through the [`Transport`],
//! 3. classifies the outcome and, for transient failures, sleeps and retries
//!    inside the same slot,
//! 4. returns the response or the last observed error.

mod backoff;
mod classify;
mod queue;

pub use backoff::{RETRY_AFTER_DEFAULT_MS, RETRY_AFTER_MAX_MS, delay, retry_delay};
pub use classify::{Classified, Failure, classify};
pub use queue::WorkQueue;

use tracing::warn;

use crate::error::ZendeskError;
use crate::transport::{ApiRequest, Response, Transport};

/// Default number of API calls in flight.
pub const MAX_CONCURRENT: usize = 29;

/// Default number of retries per call.
pub const MAX_RETRIES: u32 = 6;

/// One logical API call plus its retry state.
#[derive(Debug)]
struct UnitOfWork {
    request: ApiRequest,
    retries_remaining: u32,
}

/// Runs API calls with bounded concurrency and retries.
pub struct Dispatcher<T> {
    transport: T,
    queue: WorkQueue,
    max_retries: u32,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher owning `transport` and `queue`.
    #[must_use]
    pub fn new(transport: T, queue: WorkQueue, max_retries: u32) -> Self {
        Self {
            transport,
            queue,
            max_retries,
        }
    }

    /// The transport calls are made through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The queue bounding concurrent calls.
    pub fn queue(&self) -> &WorkQueue {
        &self.queue
    }

    /// Run `request` to completion.
    ///
    /// # Errors
    ///
    /// Returns the cause of the last failed attempt when the failure is not
    /// retryable or retries are exhausted.
    pub async fn dispatch(&self, request: ApiRequest) -> Result<Response, ZendeskError> {
        let unit = UnitOfWork {
            request,
            retries_remaining: self.max_retries,
        };
        self.queue.submit(|| self.run(unit)).await
    }

    /// Attempt loop; runs while holding a queue slot.
    async fn run(&self, mut unit: UnitOfWork) -> Result<Response, ZendeskError> {
        loop {
            let outcome = self.transport.call(&unit.request).await;

            let failure = match classify(outcome) {
                Classified::Success(response) => return Ok(response),
                Classified::Failure(failure) => failure,
            };

            if !failure.is_retryable() || unit.retries_remaining == 0 {
                return Err(failure.cause);
            }

            let delay = retry_delay(&failure, self.max_retries - unit.retries_remaining);
            unit.retries_remaining -= 1;

            warn!(
                resource = %unit.request.resource,
                operation = unit.request.operation,
                status = ?failure.status,
                "Retrying in {}ms ({} attempts remaining): {}",
                delay.as_millis(),
                unit.retries_remaining,
                failure.cause
            );

            tokio::time::sleep(delay).await;
        }
    }
}
