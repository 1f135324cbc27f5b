//! Concurrency-limited work queue.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::ZendeskError;

/// Runs at most `capacity` tasks at once; waiting tasks are admitted in FIFO order.
///
/// A task keeps its slot until its future completes, so work performed inside
/// the task (such as retries) never re-enters admission.
#[derive(Debug, Clone)]
pub struct WorkQueue {
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl WorkQueue {
    /// Create a queue with `capacity` slots.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::Config`] if `capacity` is zero or exceeds the
    /// semaphore limit.
    pub fn new(capacity: usize) -> Result<Self, ZendeskError> {
        if capacity == 0 || capacity > Semaphore::MAX_PERMITS {
            return Err(ZendeskError::Config(format!(
                "queue capacity must be between 1 and {}, got {capacity}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently free.
    #[must_use]
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Wait for a slot, then run `task` while holding it.
    ///
    /// # Errors
    ///
    /// Returns the task's own error, or [`ZendeskError::Task`] if the
    /// semaphore backing the queue has been closed.
    pub async fn submit<F, Fut, T>(&self, task: F) -> Result<T, ZendeskError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ZendeskError>>,
    {
        let _slot = self
            .slots
            .acquire()
            .await
            .map_err(|err| ZendeskError::Task(err.to_string()))?;
        task().await
    }
}
