//! # Handle to an app, usable while it runs.
//!
//! [`App::run`](crate::App::run) consumes the app, so anything that has to reach
//! it during a run (signal sources, admin endpoints, tests) holds an
//! [`AppHandle`] obtained beforehand with [`App::handle`](crate::App::handle).
//!
//! ## Signal path
//! ```text
//! send_signal(sig)
//!   ├─ sig ∈ notify set ─► SignalReceived ─► escalate(Shutdown) ─► token.cancel()
//!   └─ otherwise        ─► SignalIgnored
//! ```
//! Signals delivered before the run starts are latched: the root token is
//! already cancelled when the tasks are spawned.

use std::collections::HashSet;
use std::sync::Arc;

use crate::core::{alive::AliveTracker, state::RunState};
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::policies::Decision;
use crate::signals::Signal;
use crate::tasks::TaskContext;

/// State shared between the app, its runners and every handle.
pub(crate) struct Shared {
    pub(crate) state: RunState,
    pub(crate) bus: Bus,
    pub(crate) alive: AliveTracker,
    signals: HashSet<Signal>,
}

impl Shared {
    pub(crate) fn new(bus: Bus, signals: HashSet<Signal>) -> Self {
        Self {
            state: RunState::new(),
            bus,
            alive: AliveTracker::new(),
            signals: signals.into_iter().map(Signal::normalized).collect(),
        }
    }

    /// Registered signals, in a stable order.
    pub(crate) fn signals(&self) -> Vec<Signal> {
        let mut signals: Vec<Signal> = self.signals.iter().copied().collect();
        signals.sort_unstable_by_key(|s| s.to_string());
        signals
    }

    /// Merges `decision` into the run, publishing `ShutdownRequested` on the
    /// transition into shutdown. Returns the merged decision.
    pub(crate) fn escalate(&self, decision: Decision, cause: &str) -> Decision {
        let transition = self.state.record(decision);
        if transition.started_shutdown() {
            self.bus.publish(
                Event::new(EventKind::ShutdownRequested)
                    .with_decision(transition.current)
                    .with_reason(cause),
            );
        }
        transition.current
    }
}

/// Cloneable handle to a (possibly running) app.
#[derive(Clone)]
pub struct AppHandle {
    shared: Arc<Shared>,
}

impl AppHandle {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Delivers a signal.
    ///
    /// Registered signals act like a [`Decision::Shutdown`] recorded by the
    /// strategy; other signals are ignored. Returns whether the signal was
    /// registered. `Signal::Raw(n)` matches the named variant for `n`.
    pub fn send_signal(&self, signal: Signal) -> bool {
        let signal = signal.normalized();
        if !self.shared.signals.contains(&signal) {
            self.shared
                .bus
                .publish(Event::new(EventKind::SignalIgnored).with_signal(signal));
            return false;
        }

        self.shared
            .bus
            .publish(Event::new(EventKind::SignalReceived).with_signal(signal));
        self.shared
            .escalate(Decision::Shutdown, &format!("signal {signal}"));
        true
    }

    /// Reports that a signal source could not observe a signal.
    ///
    /// Publishes `SignalSourceFailed`; the run itself is not affected.
    pub fn report_source_failure(&self, error: &RuntimeError) {
        self.shared
            .bus
            .publish(Event::new(EventKind::SignalSourceFailed).with_reason(error.as_message()));
    }

    /// Requests a graceful shutdown, as if a strategy returned [`Decision::Shutdown`].
    pub fn shutdown(&self) {
        self.shared.escalate(Decision::Shutdown, "shutdown requested by handle");
    }

    /// Returns `true` once the shared token has been cancelled.
    pub fn is_shutting_down(&self) -> bool {
        self.shared.state.token().is_cancelled()
    }

    /// Completes once the shared token has been cancelled.
    pub async fn cancelled(&self) {
        self.shared.state.token().cancelled().await
    }

    /// Most severe decision recorded so far.
    pub fn decision(&self) -> Decision {
        self.shared.state.decision()
    }

    /// Tasks whose chain has started and not returned yet, by registration order.
    pub async fn running(&self) -> Vec<TaskContext> {
        self.shared.alive.snapshot().await
    }
}

impl std::fmt::Debug for AppHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppHandle")
            .field("decision", &self.decision())
            .field("shutting_down", &self.is_shutting_down())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(signals: &[Signal]) -> (AppHandle, Bus) {
        let bus = Bus::new(16);
        let shared = Arc::new(Shared::new(bus.clone(), signals.iter().copied().collect()));
        (AppHandle::new(shared), bus)
    }

    #[test]
    fn unregistered_signal_has_no_effect() {
        let (h, _bus) = handle(&[Signal::Hangup]);
        assert!(!h.send_signal(Signal::Terminate));
        assert!(!h.is_shutting_down());
        assert_eq!(h.decision(), Decision::Continue);
    }

    #[tokio::test]
    async fn registered_signal_requests_shutdown_once() {
        let (h, bus) = handle(&[Signal::Hangup]);
        let mut rx = bus.subscribe();

        assert!(h.send_signal(Signal::Hangup));
        assert!(h.send_signal(Signal::Hangup));
        assert!(h.is_shutting_down());
        assert_eq!(h.decision(), Decision::Shutdown);

        let kinds: Vec<EventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|ev| ev.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::SignalReceived,
                EventKind::ShutdownRequested,
                EventKind::SignalReceived,
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn raw_signal_matches_its_named_registration() {
        let (h, _bus) = handle(&[Signal::Raw(15)]);
        assert!(h.send_signal(Signal::Terminate));

        let (h, _bus) = handle(&[Signal::Hangup]);
        assert!(h.send_signal(Signal::Raw(1)));
        assert_eq!(h.decision(), Decision::Shutdown);
    }

    #[test]
    fn shutdown_does_not_downgrade_exit() {
        let (h, _bus) = handle(&[]);
        h.shared.escalate(Decision::Exit, "test");
        h.shutdown();
        assert_eq!(h.decision(), Decision::Exit);
    }
}
