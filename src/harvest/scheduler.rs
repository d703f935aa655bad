//! Bounded fan-out of per-source tasks
//!
//! Every input gets its own tokio task, but a task only starts its work once
//! it holds a permit from the shared semaphore, and keeps the permit until it
//! finishes. At most `limit` tasks are therefore doing work at any moment.
//! Results are read back through the join handles in input order, so the
//! output lines up with the input no matter which task finishes first.

use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

/// Default number of sources harvested at once
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Why a task slot has no value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFailure {
    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("task was cancelled")]
    Cancelled,

    #[error("scheduler closed before the task could start")]
    Closed,
}

/// Runs tasks with a fixed ceiling on how many are in flight
#[derive(Debug, Clone)]
pub struct Scheduler {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl Scheduler {
    /// Creates a scheduler admitting `limit` tasks at a time (minimum 1)
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs `task` over every input and waits for all of them to settle
    ///
    /// The returned vector has one slot per input, in input order. A task
    /// that panics fills its own slot with [`TaskFailure::Panicked`] and
    /// leaves the others untouched.
    pub async fn run_all<I, R, F, Fut>(&self, inputs: Vec<I>, task: F) -> Vec<Result<R, TaskFailure>>
    where
        I: Send + 'static,
        R: Send + 'static,
        F: Fn(I) -> Fut,
        Fut: Future<Output = R> + Send + 'static,
    {
        let handles: Vec<_> = inputs
            .into_iter()
            .map(|input| {
                let semaphore = Arc::clone(&self.semaphore);
                let work = task(input);
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| TaskFailure::Closed)?;
                    Ok(work.await)
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let slot = match handle.await {
                Ok(result) => result,
                Err(e) if e.is_panic() => Err(TaskFailure::Panicked(panic_message(e.into_panic()))),
                Err(_) => Err(TaskFailure::Cancelled),
            };
            results.push(slot);
        }

        results
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
