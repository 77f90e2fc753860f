//! Cancellable simulated-latency tasks.
//!
//! Every async service call (login, signup, prediction) runs as a tokio task
//! that sleeps for its configured delay and only then touches shared state.
//! The caller holds a `PendingTask`; dropping it or calling `cancel()` aborts
//! the task, so a caller that lost interest never sees its completion applied.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("Operation was cancelled")]
    Cancelled,
    #[error("Operation panicked: {0}")]
    Panicked(String),
}

/// Handle to an in-flight operation. Aborts the operation on drop.
///
/// Must be created inside a tokio runtime.
#[must_use = "dropping a PendingTask cancels the operation"]
pub struct PendingTask<T> {
    label: &'static str,
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> PendingTask<T> {
    /// Run `work` after `delay` has elapsed. `work` is never invoked if the
    /// task is cancelled before the delay completes.
    pub fn delayed<F>(label: &'static str, delay: Duration, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            work()
        });
        Self {
            label,
            handle: Some(handle),
        }
    }
}

impl<T> PendingTask<T> {
    /// Abort the operation. Safe to call after completion.
    pub fn cancel(mut self) {
        self.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Abort in place; awaiting the task afterwards yields `TaskError::Cancelled`.
    pub fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                tracing::debug!(task = self.label, "Pending task aborted");
            }
            handle.abort();
        }
    }
}

impl<T> Future for PendingTask<T> {
    type Output = Result<T, TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(handle) = self.handle.as_mut() else {
            return Poll::Ready(Err(TaskError::Cancelled));
        };
        let polled = Pin::new(handle).poll(cx);
        match polled {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(value)) => {
                self.handle = None;
                Poll::Ready(Ok(value))
            }
            Poll::Ready(Err(e)) => {
                self.handle = None;
                if e.is_cancelled() {
                    Poll::Ready(Err(TaskError::Cancelled))
                } else {
                    Poll::Ready(Err(TaskError::Panicked(e.to_string())))
                }
            }
        }
    }
}

impl<T> Drop for PendingTask<T> {
    fn drop(&mut self) {
        self.abort();
    }
}
