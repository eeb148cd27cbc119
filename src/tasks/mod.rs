//! # Task abstractions and registration.
//!
//! This module provides the task-related types:
//! - [`Task`] - trait for implementing async cancelable tasks
//! - [`TaskFn`] - function-based task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`TaskContext`] - identity handed out at registration
//! - [`TaskOptions`] - interceptors and strategy override of a task

mod context;
pub(crate) mod main_task;
mod options;
mod task;
mod task_fn;

pub use context::TaskContext;
pub(crate) use main_task::MainTask;
pub use options::TaskOptions;
pub use task::{BoxTaskFuture, Task, TaskRef};
pub use task_fn::TaskFn;
