//! # Example: Signals
//!
//! Runs until SIGINT (Ctrl+C) or SIGTERM arrives, logging every runtime event
//! through `tracing`.
//!
//! Run with:
//! ```bash
//! RUST_LOG=info cargo run --example signals --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use appvisor::{App, LogWriter, Signal, Subscribe, TaskError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let mut app = App::builder()
        .notify_signal([Signal::Interrupt, Signal::Terminate])
        .with_subscribers(subs)
        .build();

    app.add_main_task("ticker", |ctx: CancellationToken| async move {
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = ctx.cancelled() => return Err::<(), _>(TaskError::Canceled),
                _ = tick.tick() => tracing::info!("tick"),
            }
        }
    });

    let handle = app.handle();
    let code = app.run().await;
    tracing::info!(decision = %handle.decision(), code, "done");
    std::process::exit(code);
}
