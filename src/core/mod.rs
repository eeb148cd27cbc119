//! Runtime core: registration, run loop and shared state.
//!
//! The public API from this module is [`App`], its [`AppBuilder`], the runtime
//! [`Config`] and the [`AppHandle`] used to signal a running app.
//!
//! Internal modules:
//! - [`runner`]: executes one main task and records its outcome;
//! - [`state`]: merged decision and root cancellation token;
//! - [`alive`]: tasks that have not returned yet;
//! - [`handle`]: state shared by the app, runners and handles.

mod alive;
mod app;
mod builder;
mod config;
pub(crate) mod handle;
mod runner;
mod state;

pub use app::App;
pub use builder::AppBuilder;
pub use config::Config;
pub use handle::AppHandle;
