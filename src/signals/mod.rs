//! Signal bridge.
//!
//! ## Contents
//! - [`Signal`]       portable signal names
//! - [`SignalSource`] external collaborator that delivers signals into the app
//! - [`OsSignals`]    default source backed by `tokio::signal`
//!
//! ## Flow
//! ```text
//! OS ──► OsSignals::listen() ──► AppHandle::send_signal(sig)
//!                                   ├─ sig registered   ─► SignalReceived, record Shutdown, cancel token
//!                                   └─ sig unregistered ─► SignalIgnored (no effect on the run)
//! ```

mod signal;
mod source;

pub use signal::Signal;
pub use source::{OsSignals, SignalSource};
