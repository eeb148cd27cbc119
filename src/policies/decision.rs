//! # Supervisor-wide reaction to a failed task.
//!
//! A [`Decision`] is what an [`ErrorStrategy`](crate::ErrorStrategy) returns for a failure.
//! Decisions are totally ordered by severity:
//!
//! ```text
//! Continue  <  Shutdown  <  Exit
//!    │            │           └─► cancel every task, exit code != 0
//!    │            └─► cancel every task, exit code 0
//!    └─► ignore the failure, siblings keep running
//! ```
//!
//! The run keeps the most severe decision seen so far. Merging is `max`, so the
//! outcome does not depend on the order failures are observed in, and `Exit` is
//! absorbing.

use std::fmt;

/// Reaction to a task failure, ordered by severity.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Decision {
    /// Ignore the failure; other tasks keep running.
    #[default]
    Continue = 0,
    /// Cancel every task and wait for them; exit code `0`.
    Shutdown = 1,
    /// Cancel every task and wait for them; failing exit code.
    Exit = 2,
}

impl Decision {
    /// Merges two decisions, keeping the more severe one.
    ///
    /// # Example
    /// ```
    /// use appvisor::Decision;
    ///
    /// assert_eq!(Decision::Continue.merge(Decision::Shutdown), Decision::Shutdown);
    /// assert_eq!(Decision::Exit.merge(Decision::Shutdown), Decision::Exit);
    /// ```
    #[inline]
    pub fn merge(self, other: Decision) -> Decision {
        self.max(other)
    }

    /// Returns `true` for decisions that cancel the run (`Shutdown`, `Exit`).
    #[inline]
    pub fn is_terminal(self) -> bool {
        self >= Decision::Shutdown
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            Decision::Continue => "continue",
            Decision::Shutdown => "shutdown",
            Decision::Exit => "exit",
        }
    }

    /// Decodes the atomic representation; unknown values saturate to `Exit`.
    #[inline]
    pub(crate) fn from_repr(v: u8) -> Decision {
        match v {
            0 => Decision::Continue,
            1 => Decision::Shutdown,
            _ => Decision::Exit,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
