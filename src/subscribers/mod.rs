//! # Event subscribers for the appvisor runtime.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] that
//! fans runtime events out to user subscribers.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   runner / AppHandle ── publish(Event) ──► Bus ──► App listener ──► SubscriberSet::emit
//!                                                                        │
//!                                                          ┌─────────────┼─────────────┐
//!                                                          ▼             ▼             ▼
//!                                                      LogWriter      Metrics       Custom
//! ```
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], which renders events through `tracing`.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
