//! # Runtime events emitted by the app and its task runners.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Run events**: the run starting and finishing (with its exit code)
//! - **Task events**: one main task starting, stopping or failing
//! - **Decision events**: strategy outcomes and shutdown requests
//! - **Signal events**: deliveries accepted or ignored by the app
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task
//! identity, reasons, decisions and signals.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use appvisor::{Decision, Event, EventKind};
//!
//! let ev = Event::new(EventKind::DecisionMade)
//!     .with_reason("execution failed: boom")
//!     .with_decision(Decision::Shutdown);
//!
//! assert_eq!(ev.kind, EventKind::DecisionMade);
//! assert_eq!(ev.decision, Some(Decision::Shutdown));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::policies::Decision;
use crate::signals::Signal;
use crate::tasks::TaskContext;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Run events ===
    /// The run started.
    ///
    /// Sets:
    /// - `reason`: number of registered tasks (`tasks=N`)
    AppStarting,

    /// Every task returned; the run is about to return its exit code.
    ///
    /// Sets:
    /// - `decision`: final merged decision
    /// - `exit_code`: code returned by the run
    AllStopped,

    // === Task events ===
    /// A main task is starting.
    ///
    /// Sets:
    /// - `task`, `task_id`
    TaskStarting,

    /// A main task returned successfully.
    ///
    /// Sets:
    /// - `task`, `task_id`
    TaskStopped,

    /// A main task returned an error (including cancellation and panics).
    ///
    /// Sets:
    /// - `task`, `task_id`
    /// - `reason`: failure message
    TaskFailed,

    // === Decision events ===
    /// The error strategy returned a decision for a failed task.
    ///
    /// Sets:
    /// - `task`, `task_id`
    /// - `decision`: what the strategy returned (before merging)
    /// - `reason`: set when the strategy panicked
    DecisionMade,

    /// The run crossed into shutdown; the shared token is cancelled.
    ///
    /// Published once per run.
    ///
    /// Sets:
    /// - `decision`: merged decision at that moment
    /// - `reason`: what triggered it (task failure, signal, handle)
    ShutdownRequested,

    // === Signal events ===
    /// A registered signal was delivered.
    ///
    /// Sets:
    /// - `signal`
    SignalReceived,

    /// A signal outside the registered set was delivered and ignored.
    ///
    /// Sets:
    /// - `signal`
    SignalIgnored,

    /// The signal source stopped with an error.
    ///
    /// Sets:
    /// - `reason`: error message
    SignalSourceFailed,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Registration id of the task, if applicable.
    pub task_id: Option<u64>,
    /// Human-readable reason (errors, triggers, overflow details).
    pub reason: Option<Arc<str>>,
    /// Decision attached to the event.
    pub decision: Option<Decision>,
    /// Signal attached to the event.
    pub signal: Option<Signal>,
    /// Exit code of the run.
    pub exit_code: Option<i32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            task_id: None,
            reason: None,
            decision: None,
            signal: None,
            exit_code: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task (or subscriber) name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches the identity of a main task.
    #[inline]
    pub fn with_context(mut self, tc: &TaskContext) -> Self {
        self.task = Some(tc.name_arc());
        self.task_id = Some(tc.id());
        self
    }

    /// Attaches a decision.
    #[inline]
    pub fn with_decision(mut self, decision: Decision) -> Self {
        self.decision = Some(decision);
        self
    }

    /// Attaches a signal.
    #[inline]
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Attaches the run's exit code.
    #[inline]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::TaskStarting);
        let b = Event::new(EventKind::TaskStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn context_sets_name_and_id() {
        let tc = TaskContext::new("db");
        let ev = Event::new(EventKind::TaskFailed).with_context(&tc);
        assert_eq!(ev.task.as_deref(), Some("db"));
        assert_eq!(ev.task_id, Some(tc.id()));
    }
}
