//! # Example: Interceptors
//!
//! A default interceptor retries every task up to three times; a per-task
//! interceptor measures how long the task took.
//!
//! Run with:
//! ```bash
//! cargo run --example interceptors
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use appvisor::{App, TaskContext, TaskError, TaskOptions, TaskRef};

const ATTEMPTS: u32 = 3;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let retry = |ctx: CancellationToken, tc: TaskContext, next: TaskRef| async move {
        let mut last = Ok(());
        for attempt in 1..=ATTEMPTS {
            last = next.spawn(ctx.clone()).await;
            match &last {
                Ok(()) => break,
                Err(e) if e.is_canceled() => break,
                Err(e) => println!("[retry] {tc} attempt {attempt}/{ATTEMPTS}: {e}"),
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        last
    };

    let timed = |ctx: CancellationToken, tc: TaskContext, next: TaskRef| async move {
        let started = Instant::now();
        let res = next.spawn(ctx).await;
        println!("[timed] {tc} took {:?}", started.elapsed());
        res
    };

    let mut app = App::builder()
        .default_task_options(TaskOptions::new().interceptor(retry))
        .build();

    let calls = Arc::new(AtomicU32::new(0));
    let c = Arc::clone(&calls);
    app.add_main_task_with(
        "flaky",
        TaskOptions::new().interceptor(timed),
        move |_ctx: CancellationToken| {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                if n < ATTEMPTS {
                    return Err(TaskError::fail(format!("not ready (call {n})")));
                }
                println!("[flaky] ready after {n} calls");
                Ok(())
            }
        },
    );

    let code = app.run().await;
    println!("exit code: {code}");
    Ok(())
}
