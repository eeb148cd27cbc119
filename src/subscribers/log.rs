//! # LogWriter: events as `tracing` records
//!
//! A subscriber that renders every [`Event`] through the `tracing` facade under
//! the `appvisor` target. Install any `tracing` subscriber (e.g.
//! `tracing_subscriber::fmt`) to see the output.
//!
//! ## Levels
//! - `info`: run start/stop, task start/stop, shutdown, accepted signals
//! - `warn`: task failures, ignored signals, subscriber overflow
//! - `error`: signal source failures, subscriber panics, `Exit` decisions

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::policies::Decision;
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::AppStarting => info!(target: "appvisor", seq = e.seq, reason, "app starting"),
            EventKind::AllStopped => info!(
                target: "appvisor",
                seq = e.seq,
                decision = ?e.decision,
                exit_code = ?e.exit_code,
                "all tasks stopped"
            ),
            EventKind::TaskStarting => {
                info!(target: "appvisor", seq = e.seq, task, task_id = ?e.task_id, "task starting")
            }
            EventKind::TaskStopped => {
                info!(target: "appvisor", seq = e.seq, task, task_id = ?e.task_id, "task stopped")
            }
            EventKind::TaskFailed => warn!(
                target: "appvisor",
                seq = e.seq,
                task,
                task_id = ?e.task_id,
                reason,
                "task failed"
            ),
            EventKind::DecisionMade if e.decision == Some(Decision::Exit) => error!(
                target: "appvisor",
                seq = e.seq,
                task,
                decision = ?e.decision,
                reason,
                "strategy decided"
            ),
            EventKind::DecisionMade => info!(
                target: "appvisor",
                seq = e.seq,
                task,
                decision = ?e.decision,
                reason,
                "strategy decided"
            ),
            EventKind::ShutdownRequested => info!(
                target: "appvisor",
                seq = e.seq,
                decision = ?e.decision,
                reason,
                "shutdown requested"
            ),
            EventKind::SignalReceived => {
                info!(target: "appvisor", seq = e.seq, signal = ?e.signal, "signal received")
            }
            EventKind::SignalIgnored => {
                warn!(target: "appvisor", seq = e.seq, signal = ?e.signal, "signal ignored")
            }
            EventKind::SignalSourceFailed => {
                error!(target: "appvisor", seq = e.seq, reason, "signal source failed")
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "appvisor", seq = e.seq, subscriber = task, reason, "subscriber overflow")
            }
            EventKind::SubscriberPanicked => {
                error!(target: "appvisor", seq = e.seq, subscriber = task, reason, "subscriber panicked")
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
