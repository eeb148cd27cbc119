//! # Per-task options.
//!
//! [`TaskOptions`] carries the interceptors and the optional error-strategy
//! override of a task. The same type is used for the app-wide defaults
//! ([`AppBuilder::default_task_options`](crate::AppBuilder::default_task_options)),
//! which are layered under the options given at registration:
//!
//! ```text
//! interceptors:  defaults[0] ─► defaults[1] ─► ... ─► task[0] ─► ... ─► body
//! strategy:      task override  >  default override  >  app strategy
//! ```

use std::fmt;
use std::sync::Arc;

use crate::policies::{ErrorStrategy, Interceptor, InterceptorRef, StrategyRef};

/// Options applied to one task (or, as defaults, to every task).
#[derive(Clone, Default)]
pub struct TaskOptions {
    interceptors: Vec<InterceptorRef>,
    error_strategy: Option<StrategyRef>,
}

impl TaskOptions {
    /// Empty options: no interceptors, no strategy override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interceptor; earlier interceptors wrap later ones.
    pub fn interceptor(self, interceptor: impl Interceptor) -> Self {
        self.interceptor_arc(Arc::new(interceptor))
    }

    /// Appends an already shared interceptor.
    pub fn interceptor_arc(mut self, interceptor: InterceptorRef) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Overrides the error strategy for the task(s) these options apply to.
    pub fn error_strategy(mut self, strategy: impl ErrorStrategy) -> Self {
        self.error_strategy = Some(Arc::new(strategy));
        self
    }

    /// Interceptors in wrapping order (outermost first).
    pub fn interceptors(&self) -> &[InterceptorRef] {
        &self.interceptors
    }

    /// Strategy override, if any.
    pub fn strategy(&self) -> Option<&StrategyRef> {
        self.error_strategy.as_ref()
    }

    /// Layers `top` over `self`: interceptors are concatenated (ours outermost),
    /// `top`'s strategy wins when set.
    pub(crate) fn layered(&self, top: TaskOptions) -> TaskOptions {
        let mut interceptors = Vec::with_capacity(self.interceptors.len() + top.interceptors.len());
        interceptors.extend(self.interceptors.iter().cloned());
        interceptors.extend(top.interceptors);

        TaskOptions {
            interceptors,
            error_strategy: top.error_strategy.or_else(|| self.error_strategy.clone()),
        }
    }
}

impl fmt::Debug for TaskOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskOptions")
            .field("interceptors", &self.interceptors.len())
            .field("error_strategy", &self.error_strategy.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::error::TaskError;
    use crate::policies::Decision;
    use crate::tasks::{TaskContext, TaskRef};

    fn passthrough(ctx: CancellationToken, _tc: TaskContext, next: TaskRef) -> crate::BoxTaskFuture {
        next.spawn(ctx)
    }

    #[test]
    fn layering_concatenates_interceptors_defaults_first() {
        let defaults = TaskOptions::new().interceptor(passthrough);
        let task = TaskOptions::new().interceptor(passthrough).interceptor(passthrough);
        let first = Arc::clone(&defaults.interceptors()[0]);

        let merged = defaults.layered(task);
        assert_eq!(merged.interceptors().len(), 3);
        assert!(Arc::ptr_eq(&merged.interceptors()[0], &first));
    }

    #[test]
    fn task_strategy_overrides_default_strategy() {
        let tc = TaskContext::new("t");
        let err = TaskError::fail("boom");

        let defaults = TaskOptions::new().error_strategy(Decision::Shutdown);
        let inherited = defaults.layered(TaskOptions::new());
        let overridden = defaults.layered(TaskOptions::new().error_strategy(Decision::Exit));

        assert_eq!(
            inherited.strategy().map(|s| s.decide(&tc, &err)),
            Some(Decision::Shutdown)
        );
        assert_eq!(
            overridden.strategy().map(|s| s.decide(&tc, &err)),
            Some(Decision::Exit)
        );
        assert!(TaskOptions::new().layered(TaskOptions::new()).strategy().is_none());
    }
}
