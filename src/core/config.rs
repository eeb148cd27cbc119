//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for an [`App`](crate::App), passed with
//! [`AppBuilder::with_config`](crate::AppBuilder::with_config).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1
//! - `exit_code = 0` → replaced by 1 (an `Exit` outcome is never reported as success)

use crate::policies::Decision;

/// Global configuration for the app runtime.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1)
/// - `exit_code`: Code returned by [`App::run`](crate::App::run) when the run ends in [`Decision::Exit`]
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Subscribers lagging behind more than `bus_capacity` events skip the oldest ones.
    pub bus_capacity: usize,

    /// Process exit code reported for an `Exit` outcome.
    pub exit_code: i32,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Maps the final decision of a run to its exit code.
    ///
    /// # Example
    /// ```
    /// use appvisor::{Config, Decision};
    ///
    /// let cfg = Config::default();
    /// assert_eq!(cfg.exit_code_for(Decision::Continue), 0);
    /// assert_eq!(cfg.exit_code_for(Decision::Shutdown), 0);
    /// assert_eq!(cfg.exit_code_for(Decision::Exit), 1);
    /// ```
    pub fn exit_code_for(&self, decision: Decision) -> i32 {
        match decision {
            Decision::Exit if self.exit_code == 0 => 1,
            Decision::Exit => self.exit_code,
            Decision::Continue | Decision::Shutdown => 0,
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `exit_code = 1`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            exit_code: 1,
        }
    }
}
