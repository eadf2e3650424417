use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashboard_engine::{
    AdminClient, EngineEvent, EngineHandle, FailureKind, FetchError, StartAccepted, StatusPayload,
};

/// Answers every status call with its call number as progress; the first
/// call is held back for a while.
struct ScriptedClient {
    calls: AtomicUsize,
    first_delay: Duration,
}

impl ScriptedClient {
    fn new(first_delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            first_delay,
        }
    }
}

#[async_trait::async_trait]
impl AdminClient for ScriptedClient {
    async fn start_job(&self, job: &str) -> Result<StartAccepted, FetchError> {
        if job == "olx" {
            Ok(StartAccepted {
                message: Some("started".to_string()),
            })
        } else {
            Err(FetchError {
                kind: FailureKind::HttpStatus(404),
                message: "unknown parser".to_string(),
            })
        }
    }

    async fn fetch_status(&self) -> Result<StatusPayload, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == 1 {
            tokio::time::sleep(self.first_delay).await;
        }
        Ok(StatusPayload {
            progress_percent: call as i64,
            current_task: None,
            log: Vec::new(),
            complete: false,
            error: None,
            summary: None,
        })
    }
}

fn engine(first_delay: Duration) -> EngineHandle {
    EngineHandle::with_client(Arc::new(ScriptedClient::new(first_delay))).expect("engine")
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    engine
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event")
}

#[test]
fn start_reports_outcome_for_the_run() {
    let engine = engine(Duration::ZERO);

    engine.start(4, "olx");
    assert_eq!(
        next_event(&engine),
        EngineEvent::StartFinished {
            run_id: 4,
            result: Ok(StartAccepted {
                message: Some("started".to_string()),
            }),
        }
    );

    engine.start(5, "avito");
    match next_event(&engine) {
        EngineEvent::StartFinished { run_id, result } => {
            assert_eq!(run_id, 5);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(404));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn poll_timer_ticks_immediately_and_stops_on_request() {
    let engine = engine(Duration::ZERO);
    let started = Instant::now();

    engine.begin_polling(1, Duration::from_millis(30));
    assert_eq!(next_event(&engine), EngineEvent::PollDue { run_id: 1 });
    assert!(started.elapsed() < Duration::from_millis(500));
    assert_eq!(next_event(&engine), EngineEvent::PollDue { run_id: 1 });
    assert_eq!(next_event(&engine), EngineEvent::PollDue { run_id: 1 });

    engine.stop_polling(1);
    // Stopping twice, or a run that never polled, is harmless.
    engine.stop_polling(1);
    engine.stop_polling(99);
    std::thread::sleep(Duration::from_millis(100));
    while engine.try_recv().is_some() {}

    assert_eq!(engine.recv_timeout(Duration::from_millis(200)), None);
}

#[test]
fn slow_status_request_does_not_hold_back_later_ones() {
    let engine = engine(Duration::from_millis(400));

    engine.fetch_status(1, 1);
    // Let the first request reach the client before the second is issued.
    std::thread::sleep(Duration::from_millis(50));
    engine.fetch_status(1, 2);

    let first = next_event(&engine);
    let second = next_event(&engine);
    let dispatches: Vec<u64> = [first, second]
        .into_iter()
        .map(|event| match event {
            EngineEvent::StatusFetched {
                run_id: 1,
                dispatch,
                result,
            } => {
                assert!(result.is_ok());
                dispatch
            }
            other => panic!("unexpected event {other:?}"),
        })
        .collect();

    // The second request overtakes the held-back first one.
    assert_eq!(dispatches, vec![2, 1]);
}
