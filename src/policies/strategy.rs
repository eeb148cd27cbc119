//! # Error strategies: turning a task failure into a [`Decision`].
//!
//! An [`ErrorStrategy`] is consulted once per failed task invocation, with the
//! failing task's [`TaskContext`] and its [`TaskError`]. Tasks fail concurrently,
//! so the runtime serializes every call through a [`StrategyGate`]; a strategy
//! never observes two calls at once.
//!
//! Ready-made strategies:
//! - any [`Decision`] value is a constant strategy (`Decision::Shutdown` always shuts down);
//! - any `Fn(&TaskContext, &TaskError) -> Decision` closure;
//! - [`DefaultStrategy`] used when nothing is configured.
//!
//! ## Example
//! ```rust
//! use appvisor::{App, Decision, TaskContext, TaskError};
//!
//! let app = App::builder()
//!     .error_strategy(|_tc: &TaskContext, err: &TaskError| {
//!         if err.is_canceled() { Decision::Continue } else { Decision::Shutdown }
//!     })
//!     .build();
//! # drop(app);
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{TaskError, panic_message};
use crate::policies::Decision;
use crate::tasks::TaskContext;

/// Decides how the supervisor reacts to a failed task.
pub trait ErrorStrategy: Send + Sync + 'static {
    /// Returns the decision for `error`, raised by the task identified by `task`.
    fn decide(&self, task: &TaskContext, error: &TaskError) -> Decision;
}

/// Shared handle to a strategy.
pub type StrategyRef = Arc<dyn ErrorStrategy>;

impl<F> ErrorStrategy for F
where
    F: Fn(&TaskContext, &TaskError) -> Decision + Send + Sync + 'static,
{
    fn decide(&self, task: &TaskContext, error: &TaskError) -> Decision {
        self(task, error)
    }
}

impl ErrorStrategy for Decision {
    fn decide(&self, _task: &TaskContext, _error: &TaskError) -> Decision {
        *self
    }
}

/// Strategy applied when none is configured.
///
/// - [`TaskError::Canceled`] → [`Decision::Continue`] (the task only reacted to a shutdown);
/// - any other failure → [`Decision::Exit`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStrategy;

impl ErrorStrategy for DefaultStrategy {
    fn decide(&self, _task: &TaskContext, error: &TaskError) -> Decision {
        if error.is_canceled() {
            Decision::Continue
        } else {
            Decision::Exit
        }
    }
}

/// Serializes strategy invocations for one run.
///
/// A panicking strategy is reported as `Err(panic message)`; the lock is
/// recovered on the next call.
#[derive(Default)]
pub(crate) struct StrategyGate {
    lock: Mutex<()>,
}

impl StrategyGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Invokes `strategy` while holding the gate.
    pub(crate) fn decide(
        &self,
        strategy: &dyn ErrorStrategy,
        task: &TaskContext,
        error: &TaskError,
    ) -> Result<Decision, String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        catch_unwind(AssertUnwindSafe(|| strategy.decide(task, error)))
            .map_err(|payload| panic_message(payload.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_strategy_returns_itself() {
        let tc = TaskContext::new("t");
        let err = TaskError::fail("boom");
        assert_eq!(Decision::Shutdown.decide(&tc, &err), Decision::Shutdown);
        assert_eq!(Decision::Continue.decide(&tc, &err), Decision::Continue);
    }

    #[test]
    fn default_strategy_tolerates_cancellation_only() {
        let tc = TaskContext::new("t");
        assert_eq!(
            DefaultStrategy.decide(&tc, &TaskError::Canceled),
            Decision::Continue
        );
        assert_eq!(
            DefaultStrategy.decide(&tc, &TaskError::fail("boom")),
            Decision::Exit
        );
        assert_eq!(
            DefaultStrategy.decide(&tc, &TaskError::Panicked { info: "x".into() }),
            Decision::Exit
        );
    }

    #[test]
    fn closure_sees_the_failing_context() {
        let expected = TaskContext::new("worker");
        let probe = expected.clone();
        let strategy = move |tc: &TaskContext, _err: &TaskError| {
            if *tc == probe {
                Decision::Exit
            } else {
                Decision::Continue
            }
        };

        let err = TaskError::fail("boom");
        assert_eq!(strategy.decide(&expected, &err), Decision::Exit);
        assert_eq!(
            strategy.decide(&TaskContext::new("worker"), &err),
            Decision::Continue
        );
    }

    #[test]
    fn gate_reports_panics_and_recovers() {
        let gate = StrategyGate::new();
        let tc = TaskContext::new("t");
        let err = TaskError::fail("boom");

        let panicking = |_tc: &TaskContext, _err: &TaskError| -> Decision { panic!("bad strategy") };
        assert_eq!(
            gate.decide(&panicking, &tc, &err),
            Err("bad strategy".to_string())
        );
        assert_eq!(gate.decide(&Decision::Shutdown, &tc, &err), Ok(Decision::Shutdown));
    }
}
