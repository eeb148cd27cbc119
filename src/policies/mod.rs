//! Failure and execution policies.
//!
//! This module groups the knobs that control **what happens when a task fails**
//! and **how a task body is executed**.
//!
//! ## Contents
//! - [`Decision`]      supervisor-wide reaction (continue / shutdown / exit)
//! - [`ErrorStrategy`] maps a failed task to a [`Decision`]
//! - [`Interceptor`]   wraps a task body (retry, swallow, instrument, ...)
//!
//! ## Quick wiring
//! ```text
//! App::add_main_task(name, body)
//!      └─► interceptor::wrap(body, defaults ++ per-task)   (once, at registration)
//!
//! runner::run_main_task()
//!      └─► chain.spawn(token) ─► Err(e)
//!            └─► StrategyGate::decide(strategy, tc, e) ─► Decision ─► RunState::record()
//! ```

mod decision;
pub(crate) mod interceptor;
pub(crate) mod strategy;

pub use decision::Decision;
pub use interceptor::{Interceptor, InterceptorRef};
pub use strategy::{DefaultStrategy, ErrorStrategy, StrategyRef};
