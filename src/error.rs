//! Error context for task joins.
//!
//! The cancellation core itself cannot fail; the only errors surfacing to
//! the CLI are tasks that panicked instead of returning.

use anyhow::{Context, Result};
use tokio::task::JoinError;

/// Extension trait to add task-specific context to join errors.
pub trait JoinErrorContext<T> {
    /// Add context for joining a polling worker.
    fn context_worker(self, label: &str) -> Result<T>;

    /// Add context for joining a timed wait-group task.
    fn context_task(self, label: &str) -> Result<T>;
}

impl<T> JoinErrorContext<T> for std::result::Result<T, JoinError> {
    fn context_worker(self, label: &str) -> Result<T> {
        self.with_context(|| format!("Worker '{}' did not shut down cleanly", label))
    }

    fn context_task(self, label: &str) -> Result<T> {
        self.with_context(|| format!("Task '{}' failed before finishing", label))
    }
}
