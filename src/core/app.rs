//! # App: starts the main tasks, applies the failure policy, computes the exit code.
//!
//! The [`App`] owns the task registry, the shared run state (root token +
//! merged decision) and the event bus. [`App::run`] starts every registered
//! task concurrently and returns once all of them have returned.
//!
//! ## High-level architecture
//! ```text
//! Registration (before run):
//!   add_main_task(name, body) ──► MainTask { TaskContext, interceptor chain, strategy }
//!
//! App::run():
//!   - subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!   - spawn signal source (if any signal registered) ─► AppHandle::send_signal
//!   - one runner per MainTask in a JoinSet, each with root_token.child_token()
//!
//!   runner ── Err(e) ──► strategy ──► Decision ──► RunState::record
//!                                                     └─ terminal ─► root_token.cancel()
//!
//!   join all runners ─► AllStopped{ exit_code } ─► drain listener ─► return exit_code
//! ```
//!
//! ## Rules
//! - The run never times out: a task that ignores its token keeps `run` waiting.
//! - A failure never cancels siblings by itself; only a terminal decision
//!   (strategy, registered signal or [`AppHandle::shutdown`]) does.
//! - Exit code is `0` unless the merged decision is [`Decision::Exit`].
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use appvisor::{App, Decision, Signal, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut app = App::builder()
//!         .error_strategy(Decision::Shutdown)
//!         .notify_signal([Signal::Interrupt, Signal::Terminate])
//!         .build();
//!
//!     app.add_main_task("server", |ctx: CancellationToken| async move {
//!         tokio::select! {
//!             _ = ctx.cancelled() => Err(TaskError::Canceled),
//!             _ = tokio::time::sleep(Duration::from_millis(10)) => Ok(()),
//!         }
//!     });
//!
//!     let code = app.run().await;
//!     assert_eq!(code, 0);
//! }
//! ```

use std::borrow::Cow;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use super::{builder::AppBuilder, config::Config, handle::AppHandle, handle::Shared, runner};
use crate::error::{RuntimeError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::policies::{Decision, StrategyRef, strategy::StrategyGate};
use crate::signals::{Signal, SignalSource};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::tasks::{MainTask, TaskContext, TaskFn, TaskOptions, TaskRef};

/// Supervisor of a process's main tasks.
pub struct App {
    cfg: Config,
    shared: Arc<Shared>,
    strategy: StrategyRef,
    defaults: TaskOptions,
    source: Arc<dyn SignalSource>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    tasks: Vec<MainTask>,
}

impl App {
    /// Creates an app with default configuration and [`DefaultStrategy`](crate::DefaultStrategy).
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder for configuring the app.
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    pub(crate) fn from_parts(
        cfg: Config,
        strategy: StrategyRef,
        defaults: TaskOptions,
        signals: HashSet<Signal>,
        source: Arc<dyn SignalSource>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self {
            cfg,
            shared: Arc::new(Shared::new(bus, signals)),
            strategy,
            defaults,
            source,
            subscribers,
            tasks: Vec::new(),
        }
    }

    /// Registers a main task with the default options.
    ///
    /// The name is advisory: empty and duplicate names are allowed.
    pub fn add_main_task<F, Fut>(&mut self, name: impl Into<Cow<'static, str>>, f: F) -> TaskContext
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.add_main_task_with(name, TaskOptions::new(), f)
    }

    /// Registers a main task with extra options layered over the defaults.
    pub fn add_main_task_with<F, Fut>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        options: TaskOptions,
        f: F,
    ) -> TaskContext
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.add_task(TaskFn::arc(name, f), options)
    }

    /// Registers an existing [`Task`](crate::Task) implementation.
    pub fn add_task(&mut self, task: TaskRef, options: TaskOptions) -> TaskContext {
        let entry = MainTask::new(task, self.defaults.layered(options));
        let context = entry.context.clone();
        self.tasks.push(entry);
        context
    }

    /// Number of registered tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns a handle for signalling the app while it runs.
    pub fn handle(&self) -> AppHandle {
        AppHandle::new(Arc::clone(&self.shared))
    }

    /// Delivers a signal; see [`AppHandle::send_signal`].
    pub fn send_signal(&self, signal: Signal) -> bool {
        self.handle().send_signal(signal)
    }

    /// Runs every registered task until all of them have returned.
    ///
    /// Returns the process exit code: `0`, or [`Config::exit_code`] when the
    /// merged decision is [`Decision::Exit`].
    pub async fn run(self) -> i32 {
        let App {
            cfg,
            shared,
            strategy,
            source,
            subscribers,
            tasks,
            ..
        } = self;

        let listener = subscriber_listener(&shared.bus, subscribers);
        shared.bus.publish(
            Event::new(EventKind::AppStarting).with_reason(format!("tasks={}", tasks.len())),
        );
        let signals = spawn_signal_source(&shared, source);

        let gate = Arc::new(StrategyGate::new());
        let mut set = JoinSet::new();
        for task in tasks {
            let strategy = task.strategy.clone().unwrap_or_else(|| Arc::clone(&strategy));
            set.spawn(runner::run_main_task(
                task,
                strategy,
                Arc::clone(&shared),
                Arc::clone(&gate),
            ));
        }

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                if e.is_panic() {
                    shared.escalate(Decision::Exit, "task runner panicked");
                }
            }
        }

        if let Some(h) = signals {
            h.abort();
        }

        let decision = shared.state.decision();
        let code = cfg.exit_code_for(decision);
        shared.bus.publish(
            Event::new(EventKind::AllStopped)
                .with_decision(decision)
                .with_exit_code(code),
        );

        if let Some(l) = listener {
            l.finish().await;
        }
        code
    }

    /// Runs the app on a fresh multi-threaded tokio runtime.
    ///
    /// Meant as the last statement of `main`:
    /// ```no_run
    /// # use appvisor::App;
    /// fn main() {
    ///     let app = App::new();
    ///     // app.add_main_task(...);
    ///     let code = app.run_blocking().unwrap_or(1);
    ///     std::process::exit(code);
    /// }
    /// ```
    pub fn run_blocking(self) -> Result<i32, RuntimeError> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(RuntimeError::Runtime)?;
        Ok(rt.block_on(self.run()))
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the signal source when at least one signal is registered.
fn spawn_signal_source(shared: &Arc<Shared>, source: Arc<dyn SignalSource>) -> Option<JoinHandle<()>> {
    let signals = shared.signals();
    if signals.is_empty() {
        return None;
    }

    let sink = AppHandle::new(Arc::clone(shared));
    let bus = shared.bus.clone();
    Some(tokio::spawn(async move {
        if let Err(e) = source.listen(signals, sink).await {
            bus.publish(Event::new(EventKind::SignalSourceFailed).with_reason(e.as_message()));
        }
    }))
}

/// Forwards bus events to the subscriber set until [`Listener::finish`].
struct Listener {
    done: CancellationToken,
    join: JoinHandle<()>,
    set: Arc<SubscriberSet>,
}

impl Listener {
    /// Drains what is still buffered on the bus, then waits for every subscriber.
    ///
    /// Reports published by the workers after this point have no listener.
    async fn finish(self) {
        self.done.cancel();
        let _ = self.join.await;
        if let Ok(set) = Arc::try_unwrap(self.set) {
            set.shutdown().await;
        }
    }
}

/// Subscribes to the bus and forwards events to the subscriber set.
fn subscriber_listener(bus: &Bus, subscribers: Vec<Arc<dyn Subscribe>>) -> Option<Listener> {
    if subscribers.is_empty() {
        return None;
    }

    let set = Arc::new(SubscriberSet::new(subscribers, bus.clone()));
    let mut rx = bus.subscribe();
    let done = CancellationToken::new();

    let stop = done.clone();
    let fanout = Arc::clone(&set);
    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Ok(ev) => fanout.emit_arc(Arc::new(ev)),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => return,
                },
                _ = stop.cancelled() => break,
            }
        }
        loop {
            match rx.try_recv() {
                Ok(ev) => fanout.emit_arc(Arc::new(ev)),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
    });

    Some(Listener { done, join, set })
}
