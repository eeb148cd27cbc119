//! # Run one main task.
//!
//! Executes the interceptor chain of a [`MainTask`] once, consults its error
//! strategy on failure and merges the decision into the run state.
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   TaskStarting ─► chain.spawn() ─► Ok(())  ─► TaskStopped
//!
//! Failure (error, cancellation or panic):
//!   TaskStarting ─► chain.spawn() ─► Err(e) ─► TaskFailed
//!                                            ─► StrategyGate::decide() ─► DecisionMade
//!                                            ─► Shared::escalate()      ─► [ShutdownRequested]
//! ```
//!
//! ## Rules
//! - The chain is spawned **exactly once** per run.
//! - Each task gets a **child token** of the shared root token.
//! - Cancellation failures go through the strategy like any other failure; the
//!   monotonic merge keeps a late `Continue`/`Shutdown` from undoing an `Exit`.
//! - A panicking body becomes [`TaskError::Panicked`]; a panicking strategy
//!   becomes [`Decision::Exit`].

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::core::handle::Shared;
use crate::error::{TaskError, panic_message};
use crate::events::{Event, EventKind};
use crate::policies::{Decision, StrategyRef, strategy::StrategyGate};
use crate::tasks::{MainTask, Task};

/// Runs `task` to completion and records its outcome.
pub(crate) async fn run_main_task(
    task: MainTask,
    strategy: StrategyRef,
    shared: Arc<Shared>,
    gate: Arc<StrategyGate>,
) {
    let MainTask { context, chain, .. } = task;
    let token = shared.state.token().child_token();

    shared.alive.insert(&context).await;
    shared
        .bus
        .publish(Event::new(EventKind::TaskStarting).with_context(&context));

    let res = execute(chain.as_ref(), token).await;
    shared.alive.remove(&context).await;

    let err = match res {
        Ok(()) => {
            shared
                .bus
                .publish(Event::new(EventKind::TaskStopped).with_context(&context));
            return;
        }
        Err(e) => e,
    };

    shared.bus.publish(
        Event::new(EventKind::TaskFailed)
            .with_context(&context)
            .with_reason(err.to_string()),
    );

    let decided = gate.decide(strategy.as_ref(), &context, &err);
    let mut ev = Event::new(EventKind::DecisionMade).with_context(&context);
    let decision = match decided {
        Ok(d) => d,
        Err(info) => {
            ev = ev.with_reason(format!("strategy panicked: {info}"));
            Decision::Exit
        }
    };
    shared.bus.publish(ev.with_decision(decision));

    shared.escalate(decision, &format!("task {context} failed: {err}"));
}

/// Spawns the chain once, turning panics (while building or polling the future) into errors.
async fn execute(chain: &dyn Task, token: CancellationToken) -> Result<(), TaskError> {
    let fut = match std::panic::catch_unwind(AssertUnwindSafe(|| chain.spawn(token))) {
        Ok(fut) => fut,
        Err(payload) => {
            return Err(TaskError::Panicked {
                info: panic_message(payload.as_ref()),
            });
        }
    };

    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(res) => res,
        Err(payload) => Err(TaskError::Panicked {
            info: panic_message(payload.as_ref()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;
    use crate::events::Bus;
    use crate::policies::DefaultStrategy;
    use crate::tasks::{TaskFn, TaskOptions, TaskRef};

    fn shared() -> Arc<Shared> {
        Arc::new(Shared::new(Bus::new(64), HashSet::new()))
    }

    fn main_task(body: TaskRef) -> MainTask {
        MainTask::new(body, TaskOptions::new())
    }

    #[tokio::test]
    async fn success_does_not_consult_the_strategy() {
        let shared = shared();
        let calls = Arc::new(Mutex::new(0));
        let probe = Arc::clone(&calls);
        let strategy: StrategyRef = Arc::new(move |_tc: &crate::TaskContext, _e: &TaskError| {
            *probe.lock().unwrap() += 1;
            Decision::Exit
        });

        let body: TaskRef = TaskFn::arc("ok", |_ctx: CancellationToken| async { Ok::<(), TaskError>(()) });
        run_main_task(main_task(body), strategy, Arc::clone(&shared), Arc::new(StrategyGate::new())).await;

        assert_eq!(*calls.lock().unwrap(), 0);
        assert_eq!(shared.state.decision(), Decision::Continue);
        assert!(shared.alive.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn failure_merges_the_decision_and_cancels() {
        let shared = shared();
        let body: TaskRef = TaskFn::arc("bad", |_ctx: CancellationToken| async {
            Err::<(), _>(TaskError::fail("boom"))
        });

        run_main_task(
            main_task(body),
            Arc::new(Decision::Shutdown),
            Arc::clone(&shared),
            Arc::new(StrategyGate::new()),
        )
        .await;

        assert_eq!(shared.state.decision(), Decision::Shutdown);
        assert!(shared.state.token().is_cancelled());
    }

    #[tokio::test]
    async fn panicking_body_is_a_failure() {
        let shared = shared();
        let mut rx = shared.bus.subscribe();
        let body: TaskRef = TaskFn::arc("panics", |_ctx: CancellationToken| async {
            if true {
                panic!("kaboom");
            }
            Ok::<(), TaskError>(())
        });

        run_main_task(
            main_task(body),
            Arc::new(DefaultStrategy),
            Arc::clone(&shared),
            Arc::new(StrategyGate::new()),
        )
        .await;

        assert_eq!(shared.state.decision(), Decision::Exit);
        let failed = std::iter::from_fn(|| rx.try_recv().ok())
            .find(|ev| ev.kind == EventKind::TaskFailed)
            .unwrap();
        assert_eq!(failed.reason.as_deref(), Some("task panicked: kaboom"));
    }

    #[tokio::test]
    async fn panicking_strategy_exits() {
        let shared = shared();
        let body: TaskRef = TaskFn::arc("bad", |_ctx: CancellationToken| async {
            Err::<(), _>(TaskError::fail("boom"))
        });
        let strategy: StrategyRef =
            Arc::new(|_tc: &crate::TaskContext, _e: &TaskError| -> Decision { panic!("no decision") });

        run_main_task(main_task(body), strategy, Arc::clone(&shared), Arc::new(StrategyGate::new())).await;
        assert_eq!(shared.state.decision(), Decision::Exit);
    }

    #[tokio::test]
    async fn task_token_is_a_child_of_the_root() {
        let shared = shared();
        shared.state.token().cancel();
        let body: TaskRef = TaskFn::arc("watch", |ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                Err(TaskError::Canceled)
            } else {
                Ok(())
            }
        });

        run_main_task(
            main_task(body),
            Arc::new(DefaultStrategy),
            Arc::clone(&shared),
            Arc::new(StrategyGate::new()),
        )
        .await;

        // cancellation failures are tolerated by the default strategy
        assert_eq!(shared.state.decision(), Decision::Continue);
    }
}
