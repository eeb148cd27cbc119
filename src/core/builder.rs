use std::collections::HashSet;
use std::sync::Arc;

use super::{app::App, config::Config};
use crate::policies::{DefaultStrategy, ErrorStrategy, Interceptor, StrategyRef};
use crate::signals::{OsSignals, Signal, SignalSource};
use crate::subscribers::Subscribe;
use crate::tasks::TaskOptions;

/// Builder for constructing an [`App`].
///
/// Every option is optional; `App::builder().build()` equals [`App::new`].
pub struct AppBuilder {
    cfg: Config,
    strategy: Option<StrategyRef>,
    defaults: TaskOptions,
    signals: HashSet<Signal>,
    source: Option<Arc<dyn SignalSource>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl AppBuilder {
    /// Creates a builder with [`Config::default`].
    pub fn new() -> Self {
        Self {
            cfg: Config::default(),
            strategy: None,
            defaults: TaskOptions::new(),
            signals: HashSet::new(),
            source: None,
            subscribers: Vec::new(),
        }
    }

    /// Replaces the runtime configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Installs the strategy consulted for every failed task.
    ///
    /// Without one, [`DefaultStrategy`] applies.
    pub fn error_strategy(mut self, strategy: impl ErrorStrategy) -> Self {
        self.strategy = Some(Arc::new(strategy));
        self
    }

    /// Adds options applied to every task registered afterwards.
    ///
    /// Interceptors are appended to the default chain; a strategy override
    /// replaces the previous default override.
    pub fn default_task_options(mut self, options: TaskOptions) -> Self {
        self.defaults = self.defaults.layered(options);
        self
    }

    /// Appends an interceptor to the default options.
    pub fn interceptor(mut self, interceptor: impl Interceptor) -> Self {
        self.defaults = self.defaults.interceptor(interceptor);
        self
    }

    /// Registers signals that trigger a graceful shutdown.
    pub fn notify_signal(mut self, signals: impl IntoIterator<Item = Signal>) -> Self {
        self.signals.extend(signals.into_iter().map(Signal::normalized));
        self
    }

    /// Replaces the signal source (default: [`OsSignals`]).
    pub fn signal_source(mut self, source: impl SignalSource) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one event subscriber.
    pub fn subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the app. No runtime is required until [`App::run`].
    pub fn build(self) -> App {
        App::from_parts(
            self.cfg,
            self.strategy.unwrap_or_else(|| Arc::new(DefaultStrategy)),
            self.defaults,
            self.signals,
            self.source.unwrap_or_else(|| Arc::new(OsSignals)),
            self.subscribers,
        )
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
