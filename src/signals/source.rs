//! # Signal sources.
//!
//! A [`SignalSource`] turns external signal deliveries into calls to
//! [`AppHandle::send_signal`]. The run spawns the configured source once, with
//! the set registered through
//! [`AppBuilder::notify_signal`](crate::AppBuilder::notify_signal), and drops it
//! when the run ends. Whether a delivered signal has any effect is decided by
//! the app, not by the source.
//!
//! [`OsSignals`] is the default source:
//!
//! **Unix platforms:** one tokio listener per registered signal. A signal that
//! cannot be observed (e.g. `SIGKILL`) is reported as `SignalSourceFailed`
//! and the remaining signals are still observed.
//!
//! **Other platforms:** only [`Signal::Interrupt`] (via [`tokio::signal::ctrl_c`]);
//! anything else is reported as [`RuntimeError::UnsupportedSignal`].

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};

use crate::core::AppHandle;
use crate::error::RuntimeError;
use crate::signals::Signal;

/// Delivers signals into a running app.
#[async_trait]
pub trait SignalSource: Send + Sync + 'static {
    /// Listens for `signals` and forwards every delivery to `sink`.
    ///
    /// Runs until the app drops it at the end of the run; returning early is
    /// allowed (an `Err` is published as `SignalSourceFailed`).
    async fn listen(&self, signals: Vec<Signal>, sink: AppHandle) -> Result<(), RuntimeError>;
}

/// Process signal source backed by `tokio::signal`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsSignals;

#[cfg(unix)]
#[async_trait]
impl SignalSource for OsSignals {
    async fn listen(&self, signals: Vec<Signal>, sink: AppHandle) -> Result<(), RuntimeError> {
        use tokio::signal::unix::signal;

        forward(signals, sink, |sig| {
            let mut stream = signal(sig.kind())
                .map_err(|source| RuntimeError::SignalRegistration { signal: sig, source })?;
            Ok(stream::poll_fn(move |cx| stream.poll_recv(cx)).boxed())
        })
        .await;
        Ok(())
    }
}

#[cfg(not(unix))]
#[async_trait]
impl SignalSource for OsSignals {
    async fn listen(&self, signals: Vec<Signal>, sink: AppHandle) -> Result<(), RuntimeError> {
        forward(signals, sink, |sig| {
            if sig != Signal::Interrupt {
                return Err(RuntimeError::UnsupportedSignal { signal: sig });
            }
            Ok(stream::unfold((), |()| async {
                tokio::signal::ctrl_c().await.ok().map(|()| ((), ()))
            })
            .boxed())
        })
        .await;
        Ok(())
    }
}

/// Forwards deliveries of every signal that `install` could set up.
///
/// A signal that fails to install is reported on the sink and skipped; the
/// other signals keep being observed.
async fn forward<F>(signals: Vec<Signal>, sink: AppHandle, mut install: F)
where
    F: FnMut(Signal) -> Result<BoxStream<'static, ()>, RuntimeError>,
{
    let mut listeners = Vec::with_capacity(signals.len());
    for sig in signals {
        let mut deliveries = match install(sig) {
            Ok(deliveries) => deliveries,
            Err(e) => {
                sink.report_source_failure(&e);
                continue;
            }
        };
        let sink = sink.clone();
        listeners.push(async move {
            while deliveries.next().await.is_some() {
                sink.send_signal(sig);
            }
        });
    }

    futures::future::join_all(listeners).await;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::io;
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::core::handle::Shared;
    use crate::events::{Bus, EventKind};
    use crate::policies::Decision;

    fn sink(bus: &Bus, signals: &[Signal]) -> AppHandle {
        let registered: HashSet<Signal> = signals.iter().copied().collect();
        AppHandle::new(Arc::new(Shared::new(bus.clone(), registered)))
    }

    #[tokio::test]
    async fn failed_registration_keeps_other_signals_observed() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let signals = [Signal::Terminate, Signal::Raw(9)];
        let sink = sink(&bus, &signals);

        let install = |sig: Signal| match sig {
            Signal::Terminate => Ok(stream::once(async {}).chain(stream::pending()).boxed()),
            other => Err(RuntimeError::SignalRegistration {
                signal: other,
                source: io::Error::other("cannot be caught"),
            }),
        };
        let listener = tokio::spawn(forward(signals.to_vec(), sink.clone(), install));

        tokio::time::timeout(Duration::from_secs(1), sink.cancelled())
            .await
            .unwrap();
        listener.abort();
        assert_eq!(sink.decision(), Decision::Shutdown);

        let events: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        let failed = events
            .iter()
            .find(|ev| ev.kind == EventKind::SignalSourceFailed)
            .unwrap();
        assert!(failed.reason.as_deref().unwrap().contains("signal(9)"));
        assert!(
            events
                .iter()
                .any(|ev| ev.kind == EventKind::SignalReceived && ev.signal == Some(Signal::Terminate))
        );
    }

    #[tokio::test]
    async fn all_registrations_failing_returns_once_reported() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let sink = sink(&bus, &[Signal::User1]);

        forward(vec![Signal::User1], sink.clone(), |sig| {
            Err(RuntimeError::UnsupportedSignal { signal: sig })
        })
        .await;

        assert!(!sink.is_shutting_down());
        assert_eq!(rx.try_recv().unwrap().kind, EventKind::SignalSourceFailed);
    }
}
