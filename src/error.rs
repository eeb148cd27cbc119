//! Error types used by the appvisor runtime and by main tasks.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`]: errors raised by the supervisor itself (signal wiring, runtime setup).
//! - [`TaskError`]: the failure reason a main task reports back to the supervisor.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! [`TaskError::is_canceled`] separates cancellation-induced failures from organic ones,
//! so an [`ErrorStrategy`](crate::ErrorStrategy) can treat them differently.

use std::fmt::Display;

use thiserror::Error;

use crate::signals::Signal;

/// # Errors produced by the appvisor runtime.
///
/// The supervisor cannot fail because of a task; these cover the plumbing around it.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The signal cannot be observed on this platform.
    #[error("signal {signal} is not supported on this platform")]
    UnsupportedSignal {
        /// The signal that was requested.
        signal: Signal,
    },

    /// Installing an OS listener for the signal failed.
    #[error("failed to register listener for {signal}: {source}")]
    SignalRegistration {
        /// The signal that was requested.
        signal: Signal,
        /// Underlying I/O error from the OS.
        #[source]
        source: std::io::Error,
    },

    /// Building the tokio runtime for [`App::run_blocking`](crate::App::run_blocking) failed.
    #[error("failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use appvisor::{RuntimeError, Signal};
    ///
    /// let err = RuntimeError::UnsupportedSignal { signal: Signal::Hangup };
    /// assert_eq!(err.as_label(), "runtime_unsupported_signal");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::UnsupportedSignal { .. } => "runtime_unsupported_signal",
            RuntimeError::SignalRegistration { .. } => "runtime_signal_registration",
            RuntimeError::Runtime(_) => "runtime_build",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::UnsupportedSignal { signal } => format!("unsupported signal: {signal}"),
            RuntimeError::SignalRegistration { signal, source } => {
                format!("signal registration failed: {signal}: {source}")
            }
            RuntimeError::Runtime(e) => format!("runtime build failed: {e}"),
        }
    }
}

/// # Failure reason reported by a main task.
///
/// A task body returns `Ok(())` on success or one of these variants. Every
/// failure is handed to the task's [`ErrorStrategy`](crate::ErrorStrategy).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task returned early because its context was cancelled.
    #[error("context cancelled")]
    Canceled,

    /// Task body panicked; the panic was caught by the supervisor.
    #[error("task panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use appvisor::TaskError;
    ///
    /// let err = TaskError::fail("connection refused");
    /// assert_eq!(err.to_string(), "execution failed: connection refused");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "context cancelled".to_string(),
            TaskError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Indicates whether the task failed only because its context was cancelled.
    ///
    /// # Example
    /// ```
    /// use appvisor::TaskError;
    ///
    /// assert!(TaskError::Canceled.is_canceled());
    /// assert!(!TaskError::fail("boom").is_canceled());
    /// ```
    pub fn is_canceled(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(TaskError::fail("x").as_label(), "task_failed");
        assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
        assert_eq!(
            TaskError::Panicked { info: "x".into() }.as_label(),
            "task_panicked"
        );
        assert_eq!(
            RuntimeError::UnsupportedSignal {
                signal: Signal::User1
            }
            .as_label(),
            "runtime_unsupported_signal"
        );
    }

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let s: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(s.as_ref()), "static");

        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");

        let other: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
