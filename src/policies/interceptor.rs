//! # Interceptors: wrappers around a task body.
//!
//! An [`Interceptor`] receives the task's cancellation token, its [`TaskContext`]
//! and the next task in the chain. It may run code before or after the inner
//! task, call it several times, skip it, or replace its outcome: the supervisor
//! only observes what the outermost interceptor returns.
//!
//! ## Composition
//! ```text
//! interceptors = [A, B, C]          (A added first)
//!
//! A.intercept(ctx, tc, next = B)
//!   └─► B.intercept(ctx, tc, next = C)
//!         └─► C.intercept(ctx, tc, next = body)
//!               └─► body.spawn(ctx)
//! ```
//! The chain is built once, at registration; running it is a single call on the
//! outermost [`TaskRef`].
//!
//! ## Example
//! ```rust
//! use appvisor::{TaskContext, TaskError, TaskOptions, TaskRef};
//! use tokio_util::sync::CancellationToken;
//!
//! // Swallow every failure of the inner task.
//! let opts = TaskOptions::new().interceptor(
//!     |ctx: CancellationToken, _tc: TaskContext, next: TaskRef| async move {
//!         let _ = next.spawn(ctx).await;
//!         Ok::<(), TaskError>(())
//!     },
//! );
//! # drop(opts);
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::tasks::{BoxTaskFuture, Task, TaskContext, TaskRef};

/// Wraps the execution of a task.
pub trait Interceptor: Send + Sync + 'static {
    /// Runs `next` (zero or more times) and returns the outcome the supervisor sees.
    fn intercept(&self, ctx: CancellationToken, task: TaskContext, next: TaskRef) -> BoxTaskFuture;
}

/// Shared handle to an interceptor.
pub type InterceptorRef = Arc<dyn Interceptor>;

impl<F, Fut> Interceptor for F
where
    F: Fn(CancellationToken, TaskContext, TaskRef) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
{
    fn intercept(&self, ctx: CancellationToken, task: TaskContext, next: TaskRef) -> BoxTaskFuture {
        Box::pin(self(ctx, task, next))
    }
}

/// One link of the chain: an interceptor bound to the task it wraps.
struct Intercepted {
    interceptor: InterceptorRef,
    context: TaskContext,
    next: TaskRef,
}

impl Task for Intercepted {
    fn name(&self) -> &str {
        self.next.name()
    }

    fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture {
        self.interceptor
            .intercept(ctx, self.context.clone(), Arc::clone(&self.next))
    }
}

/// Builds the chain around `body`; `interceptors[0]` ends up outermost.
pub(crate) fn wrap(body: TaskRef, context: &TaskContext, interceptors: &[InterceptorRef]) -> TaskRef {
    interceptors.iter().rev().fold(body, |next, interceptor| {
        Arc::new(Intercepted {
            interceptor: Arc::clone(interceptor),
            context: context.clone(),
            next,
        }) as TaskRef
    })
}
