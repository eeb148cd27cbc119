//! # Registered main task.
//!
//! [`MainTask`] is what the registry holds after
//! [`App::add_main_task`](crate::App::add_main_task): the task identity, the body
//! already wrapped by its interceptor chain, and the resolved strategy override.

use crate::policies::{StrategyRef, interceptor};
use crate::tasks::{TaskContext, TaskOptions, TaskRef};

/// A task ready to be started by the run loop.
pub(crate) struct MainTask {
    pub(crate) context: TaskContext,
    pub(crate) chain: TaskRef,
    pub(crate) strategy: Option<StrategyRef>,
}

impl MainTask {
    /// Binds `body` to a fresh [`TaskContext`] and composes its interceptor chain.
    pub(crate) fn new(body: TaskRef, options: TaskOptions) -> Self {
        let context = TaskContext::new(body.name());
        let chain = interceptor::wrap(body, &context, options.interceptors());
        Self {
            context,
            chain,
            strategy: options.strategy().cloned(),
        }
    }
}
