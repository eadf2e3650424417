use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dashboard_logging::{dashboard_debug, dashboard_info, dashboard_warn};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::client::{AdminClient, ClientSettings, ReqwestAdminClient};
use crate::{EngineEvent, FetchError, RunId};

enum EngineCommand {
    Start { run_id: RunId, job: String },
    BeginPolling { run_id: RunId, period: Duration },
    FetchStatus { run_id: RunId, dispatch: u64 },
    StopPolling { run_id: RunId },
    WatchInterrupts,
}

/// Runs HTTP requests and poll timers on a background tokio runtime.
///
/// Commands go in through the handle; results come back as [`EngineEvent`]s
/// in the order they complete.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let client = ReqwestAdminClient::new(settings)?;
        Self::with_client(Arc::new(client)).map_err(|err| {
            FetchError::new(crate::FailureKind::Network, format!("tokio runtime: {err}"))
        })
    }

    /// Builds an engine around any [`AdminClient`].
    pub fn with_client(client: Arc<dyn AdminClient>) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let mut timers: HashMap<RunId, CancellationToken> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &client, &mut timers, command, &event_tx);
            }
            for token in timers.into_values() {
                token.cancel();
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start(&self, run_id: RunId, job: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Start {
            run_id,
            job: job.into(),
        });
    }

    /// Starts the wall-clock poll timer for `run_id`. The first
    /// [`EngineEvent::PollDue`] is emitted immediately.
    pub fn begin_polling(&self, run_id: RunId, period: Duration) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::BeginPolling { run_id, period });
    }

    /// Issues one status request. It is not awaited against the timer, so a
    /// slow request never delays the next tick.
    pub fn fetch_status(&self, run_id: RunId, dispatch: u64) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::FetchStatus { run_id, dispatch });
    }

    /// Stops the timer for `run_id`. Safe to call for unknown or stopped runs.
    pub fn stop_polling(&self, run_id: RunId) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling { run_id });
    }

    /// Emits [`EngineEvent::Interrupted`] on every Ctrl-C.
    pub fn watch_interrupts(&self) {
        let _ = self.cmd_tx.send(EngineCommand::WatchInterrupts);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    client: &Arc<dyn AdminClient>,
    timers: &mut HashMap<RunId, CancellationToken>,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Start { run_id, job } => {
            let client = client.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                dashboard_info!(run = run_id; "starting job {}", job);
                let result = client.start_job(&job).await;
                let _ = event_tx.send(EngineEvent::StartFinished { run_id, result });
            });
        }
        EngineCommand::BeginPolling { run_id, period } => {
            let token = CancellationToken::new();
            if let Some(previous) = timers.insert(run_id, token.clone()) {
                dashboard_warn!(run = run_id; "poll timer restarted");
                previous.cancel();
            }
            let event_tx = event_tx.clone();
            runtime.spawn(run_poll_timer(run_id, period, token, event_tx));
        }
        EngineCommand::FetchStatus { run_id, dispatch } => {
            let client = client.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = client.fetch_status().await;
                let _ = event_tx.send(EngineEvent::StatusFetched {
                    run_id,
                    dispatch,
                    result,
                });
            });
        }
        EngineCommand::StopPolling { run_id } => {
            if let Some(token) = timers.remove(&run_id) {
                dashboard_debug!(run = run_id; "poll timer stopped");
                token.cancel();
            }
        }
        EngineCommand::WatchInterrupts => {
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                while tokio::signal::ctrl_c().await.is_ok() {
                    if event_tx.send(EngineEvent::Interrupted).is_err() {
                        break;
                    }
                }
            });
        }
    }
}

async fn run_poll_timer(
    run_id: RunId,
    period: Duration,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                if event_tx.send(EngineEvent::PollDue { run_id }).is_err() {
                    break;
                }
            }
        }
    }
}
