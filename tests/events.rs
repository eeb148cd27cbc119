//! Events published during a run reach subscribers before `run` returns.

use std::sync::{Arc, Mutex};

use appvisor::{App, Decision, Event, EventKind, Signal, Subscribe, TaskError};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct Collect(Mutex<Vec<Event>>);

impl Collect {
    fn kinds(&self) -> Vec<EventKind> {
        self.0.lock().unwrap().iter().map(|ev| ev.kind).collect()
    }

    fn find(&self, kind: EventKind) -> Option<Event> {
        self.0.lock().unwrap().iter().find(|ev| ev.kind == kind).cloned()
    }
}

#[async_trait]
impl Subscribe for Collect {
    async fn on_event(&self, ev: &Event) {
        self.0.lock().unwrap().push(ev.clone());
    }

    fn name(&self) -> &'static str {
        "collect"
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_run_is_bracketed_by_start_and_stop() {
    let collect = Arc::new(Collect::default());
    let mut app = App::builder()
        .subscriber(collect.clone() as Arc<dyn Subscribe>)
        .build();
    let tc = app.add_main_task("ok", |_ctx: CancellationToken| async { Ok::<(), TaskError>(()) });

    assert_eq!(app.run().await, 0);

    assert_eq!(
        collect.kinds(),
        vec![
            EventKind::AppStarting,
            EventKind::TaskStarting,
            EventKind::TaskStopped,
            EventKind::AllStopped,
        ]
    );
    let stopped = collect.find(EventKind::TaskStopped).unwrap();
    assert_eq!(stopped.task.as_deref(), Some("ok"));
    assert_eq!(stopped.task_id, Some(tc.id()));

    let all = collect.find(EventKind::AllStopped).unwrap();
    assert_eq!(all.exit_code, Some(0));
    assert_eq!(all.decision, Some(Decision::Continue));
}

#[tokio::test(flavor = "multi_thread")]
async fn failure_reports_decision_and_shutdown() {
    let collect = Arc::new(Collect::default());
    let mut app = App::builder()
        .error_strategy(Decision::Exit)
        .subscriber(collect.clone() as Arc<dyn Subscribe>)
        .build();
    app.add_main_task("bad", |_ctx: CancellationToken| async {
        Err::<(), _>(TaskError::fail("boom"))
    });

    assert_eq!(app.run().await, 1);

    let failed = collect.find(EventKind::TaskFailed).unwrap();
    assert_eq!(failed.reason.as_deref(), Some("execution failed: boom"));

    let decided = collect.find(EventKind::DecisionMade).unwrap();
    assert_eq!(decided.decision, Some(Decision::Exit));

    let shutdown = collect.find(EventKind::ShutdownRequested).unwrap();
    assert_eq!(shutdown.decision, Some(Decision::Exit));

    let all = collect.find(EventKind::AllStopped).unwrap();
    assert_eq!(all.exit_code, Some(1));

    let seqs: Vec<u64> = collect.0.lock().unwrap().iter().map(|ev| ev.seq).collect();
    assert!(seqs.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test(flavor = "multi_thread")]
async fn signals_during_run_are_observable() {
    let collect = Arc::new(Collect::default());
    let mut app = App::builder()
        .notify_signal([Signal::Interrupt])
        .subscriber(collect.clone() as Arc<dyn Subscribe>)
        .build();
    let handle = app.handle();
    app.add_main_task("server", |ctx: CancellationToken| async move {
        ctx.cancelled().await;
        Err::<(), _>(TaskError::Canceled)
    });

    let run = tokio::spawn(app.run());
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert!(!handle.send_signal(Signal::User1));
    assert!(handle.send_signal(Signal::Interrupt));
    assert_eq!(run.await.unwrap(), 0);

    let ignored = collect.find(EventKind::SignalIgnored).unwrap();
    assert_eq!(ignored.signal, Some(Signal::User1));
    let received = collect.find(EventKind::SignalReceived).unwrap();
    assert_eq!(received.signal, Some(Signal::Interrupt));
    assert!(collect.find(EventKind::ShutdownRequested).is_some());
}

struct Explode;

#[async_trait]
impl Subscribe for Explode {
    async fn on_event(&self, _ev: &Event) {
        panic!("subscriber exploded");
    }

    fn name(&self) -> &'static str {
        "explode"
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn panicking_subscriber_does_not_hide_run_events_from_others() {
    let collect = Arc::new(Collect::default());
    let mut app = App::builder()
        .with_subscribers(vec![
            Arc::new(Explode) as Arc<dyn Subscribe>,
            collect.clone() as Arc<dyn Subscribe>,
        ])
        .build();
    app.add_main_task("ok", |_ctx: CancellationToken| async { Ok::<(), TaskError>(()) });

    assert_eq!(app.run().await, 0);

    let kinds = collect.kinds();
    assert_eq!(kinds.first(), Some(&EventKind::AppStarting));
    assert!(kinds.contains(&EventKind::TaskStopped));
    assert!(kinds.contains(&EventKind::AllStopped));
}
