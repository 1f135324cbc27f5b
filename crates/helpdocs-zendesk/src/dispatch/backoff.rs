//! Retry delay computation.

use std::time::Duration;

use super::classify::Failure;

/// Base delay for the first retry, in milliseconds.
pub const RETRY_AFTER_DEFAULT_MS: u64 = 500;

/// Upper bound for computed delays, in milliseconds.
pub const RETRY_AFTER_MAX_MS: u64 = 8000;

/// Exponential backoff for the given retry index (0 for the first retry).
#[must_use]
pub fn delay(attempt_index: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt_index);
    Duration::from_millis(
        RETRY_AFTER_DEFAULT_MS
            .saturating_mul(factor)
            .min(RETRY_AFTER_MAX_MS),
    )
}

/// Delay before retrying `failure`: the server's hint verbatim, else backoff.
#[must_use]
pub fn retry_delay(failure: &Failure, attempt_index: u32) -> Duration {
    failure.retry_after.unwrap_or_else(|| delay(attempt_index))
}
