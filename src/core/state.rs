//! # Run state: merged decision and shared cancellation.
//!
//! [`RunState`] is the only mutable state shared by every task runner:
//! - the most severe [`Decision`] recorded so far (one atomic byte, merged with `fetch_max`);
//! - the root [`CancellationToken`] every task token is derived from.
//!
//! ## Rules
//! - The decision only moves up: `Continue → Shutdown → Exit`.
//! - Any terminal decision cancels the root token; cancelling twice is a no-op.
//! - Exactly one [`record`](RunState::record) call observes the transition into a
//!   terminal decision ([`Transition::started_shutdown`]).

use std::sync::atomic::{AtomicU8, Ordering};

use tokio_util::sync::CancellationToken;

use crate::policies::Decision;

/// Outcome of merging one decision into the run state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Transition {
    pub(crate) previous: Decision,
    pub(crate) current: Decision,
}

impl Transition {
    /// `true` for the single merge that moved the run into shutdown.
    pub(crate) fn started_shutdown(&self) -> bool {
        !self.previous.is_terminal() && self.current.is_terminal()
    }
}

/// Merged decision plus the root token of a run.
pub(crate) struct RunState {
    decision: AtomicU8,
    token: CancellationToken,
}

impl RunState {
    pub(crate) fn new() -> Self {
        Self {
            decision: AtomicU8::new(Decision::Continue as u8),
            token: CancellationToken::new(),
        }
    }

    /// Root token; tasks receive child tokens of it.
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Current merged decision.
    pub(crate) fn decision(&self) -> Decision {
        Decision::from_repr(self.decision.load(Ordering::Acquire))
    }

    /// Merges `decision` and cancels the root token if the result is terminal.
    pub(crate) fn record(&self, decision: Decision) -> Transition {
        let previous = Decision::from_repr(self.decision.fetch_max(decision as u8, Ordering::AcqRel));
        let current = previous.merge(decision);
        if current.is_terminal() {
            self.token.cancel();
        }
        Transition { previous, current }
    }
}
