//! # Example: Basic
//!
//! Three main tasks; one of them fails and the strategy shuts the others down.
//!
//! Run with:
//! ```bash
//! cargo run --example basic
//! ```

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use appvisor::{App, Decision, TaskContext, TaskError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut app = App::builder()
        .error_strategy(|tc: &TaskContext, err: &TaskError| {
            println!("[strategy] {tc} failed: {err}");
            if err.is_canceled() {
                Decision::Continue
            } else {
                Decision::Shutdown
            }
        })
        .build();

    for name in ["http", "grpc"] {
        app.add_main_task(name, move |ctx: CancellationToken| async move {
            println!("[{name}] serving");
            ctx.cancelled().await;
            println!("[{name}] stopped");
            Err::<(), _>(TaskError::Canceled)
        });
    }

    app.add_main_task("config-watcher", |_ctx: CancellationToken| async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Err::<(), _>(TaskError::fail("config file disappeared"))
    });

    let code = app.run().await;
    println!("exit code: {code}");
    Ok(())
}
