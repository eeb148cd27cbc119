//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: a named, cancelable unit of work that
//! produces a fresh future per [`spawn`](Task::spawn). The supervisor calls `spawn`
//! once per run; interceptors may call it more often.
//!
//! A task receives a [`CancellationToken`] and should watch it to stop
//! cooperatively once the run is shutting down. Returning
//! [`TaskError::Canceled`] is the conventional way to report that.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Shared handle to a task.
pub type TaskRef = Arc<dyn Task>;

/// # Asynchronous, cancelable unit.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use appvisor::{BoxTaskFuture, Task, TaskError};
///
/// struct Ticker;
///
/// impl Task for Ticker {
///     fn name(&self) -> &str { "ticker" }
///
///     fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture {
///         Box::pin(async move {
///             ctx.cancelled().await;
///             Err::<(), _>(TaskError::Canceled)
///         })
///     }
/// }
/// ```
pub trait Task: Send + Sync + 'static {
    /// Returns a human-readable task name (may be empty; it is not an identity).
    fn name(&self) -> &str;

    /// Creates a new future executing the task body.
    ///
    /// Each call must produce an independent execution.
    fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture;
}
