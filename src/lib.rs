//! # appvisor
//!
//! **Appvisor** supervises the main tasks of a process.
//!
//! A program registers its long-running main tasks (servers, consumers,
//! watchers), runs them concurrently and gets back a single exit code. When a
//! task fails, an error strategy decides whether the others keep running, are
//! asked to stop, or the process should exit with a failure code. Registered OS
//! signals request a graceful shutdown.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  main task   │   │  main task   │   │  main task   │
//!     │  + options   │   │  + options   │   │  + options   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  App (registry + run loop)                                        │
//! │  - RunState (merged Decision + root CancellationToken)            │
//! │  - Bus (broadcast events)                                         │
//! │  - AliveTracker (tasks that have not returned yet)                │
//! │  - SignalSource (OsSignals by default) ─► AppHandle::send_signal  │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    runner    │   │    runner    │   │    runner    │
//!     │ (runs once)  │   │ (runs once)  │   │ (runs once)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ Err(e) ─► ErrorStrategy ─► Decision ─► RunState::record
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                  (capacity: Config::bus_capacity)                 │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                      worker1   worker2   workerN
//! ```
//!
//! ### Decisions
//! ```text
//! Continue ──► Shutdown ──► Exit        (merge = max, never downgrades)
//!    │            │           │
//!    │            │           └─ root token cancelled, run returns Config::exit_code
//!    │            └─ root token cancelled, run returns 0
//!    └─ nothing happens, siblings keep running
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Supervision**   | Register main tasks, run them, get an exit code.             | [`App`], [`AppBuilder`], [`AppHandle`]      |
//! | **Policies**      | Map failures to decisions, wrap task bodies.                 | [`ErrorStrategy`], [`Decision`], [`Interceptor`] |
//! | **Signals**       | Graceful shutdown on registered signals.                     | [`Signal`], [`SignalSource`], [`OsSignals`] |
//! | **Subscriber API**| Observe the run (logging, metrics, custom subscribers).      | [`Subscribe`], [`Event`]                    |
//! | **Errors**        | Typed errors for tasks and runtime plumbing.                 | [`TaskError`], [`RuntimeError`]             |
//! | **Tasks**         | Define tasks as closures or trait objects.                   | [`TaskFn`], [`TaskRef`], [`TaskOptions`]    |
//! | **Configuration** | Centralize runtime settings.                                 | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], which renders events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use appvisor::{App, Decision, Signal, TaskContext, TaskError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn appvisor::Subscribe>> = vec![Arc::new(appvisor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn appvisor::Subscribe>> = Vec::new();
//!
//!     let mut app = App::builder()
//!         .error_strategy(|_tc: &TaskContext, err: &TaskError| {
//!             if err.is_canceled() { Decision::Continue } else { Decision::Shutdown }
//!         })
//!         .notify_signal([Signal::Interrupt, Signal::Terminate])
//!         .with_subscribers(subs)
//!         .build();
//!
//!     app.add_main_task("ticker", |ctx: CancellationToken| async move {
//!         tokio::select! {
//!             _ = ctx.cancelled() => Err(TaskError::Canceled),
//!             _ = tokio::time::sleep(Duration::from_millis(20)) => Ok(()),
//!         }
//!     });
//!     app.add_main_task("broken", |_ctx: CancellationToken| async move {
//!         Err::<(), _>(TaskError::fail("bad config"))
//!     });
//!
//!     // "broken" fails ─► Shutdown ─► "ticker" is cancelled ─► exit code 0
//!     assert_eq!(app.run().await, 0);
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod signals;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use core::{App, AppBuilder, AppHandle, Config};
pub use error::{RuntimeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use policies::{Decision, DefaultStrategy, ErrorStrategy, Interceptor, InterceptorRef, StrategyRef};
pub use signals::{OsSignals, Signal, SignalSource};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{BoxTaskFuture, Task, TaskContext, TaskFn, TaskOptions, TaskRef};

// Optional: expose a logger subscriber built on `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
