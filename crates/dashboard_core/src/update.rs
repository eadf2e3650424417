use dashboard_logging::{dashboard_debug, dashboard_info, dashboard_warn};

use crate::state::TASK_FINISHED;
use crate::{
    AlertSeverity, AppState, Effect, Msg, Phase, PollError, ProtocolError, RunId, StatusSnapshot,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartClicked { kind } => {
            // The guard runs before anything else is touched.
            if !state.can_start() {
                dashboard_warn!("start of {} refused: {:?}", kind, state.phase());
                state.reject_busy();
                return (state, Vec::new());
            }
            let run_id = state.begin_starting(kind);
            dashboard_info!("requesting start of {} parser as run {}", kind, run_id);
            vec![Effect::RequestStart { run_id, kind }]
        }
        Msg::StartResponded {
            run_id,
            started_at,
            result,
        } => {
            let kind = match state.phase() {
                Phase::Starting {
                    run_id: pending,
                    kind,
                } if pending == run_id => kind,
                phase => {
                    dashboard_debug!("ignoring start response for run {} in {:?}", run_id, phase);
                    return (state, Vec::new());
                }
            };
            match result {
                Ok(accepted) => {
                    dashboard_info!("{} parser accepted as run {}", kind, run_id);
                    state.accept_start(run_id, kind, started_at, accepted.message);
                    vec![Effect::BeginPolling { run_id }]
                }
                Err(err) => {
                    dashboard_warn!("{} parser failed to start: {}", kind, err);
                    let message = format!("Could not start the parser: {err}");
                    state.abort_start(err);
                    vec![Effect::ShowAlert {
                        severity: AlertSeverity::Error,
                        message,
                    }]
                }
            }
        }
        Msg::PollDue { run_id } => match state.dispatch_poll(run_id) {
            Some(dispatch) => vec![Effect::FetchStatus { run_id, dispatch }],
            None => Vec::new(),
        },
        Msg::StatusReceived {
            run_id,
            dispatch,
            result,
        } => {
            if !state.claim_response(run_id, dispatch) {
                dashboard_debug!("dropping stale status #{} for run {}", dispatch, run_id);
                return (state, Vec::new());
            }
            match result {
                Ok(snapshot) => apply_status(&mut state, run_id, snapshot),
                Err(PollError::Protocol(err)) => fail_protocol(&mut state, run_id, err),
                Err(err) => {
                    dashboard_warn!("status poll #{} failed: {}", dispatch, err);
                    state.note_poll_failure(&err);
                    Vec::new()
                }
            }
        }
        Msg::CancelRequested => match state.cancel() {
            Some(run_id) => {
                dashboard_info!("polling for run {} cancelled", run_id);
                vec![Effect::StopPolling { run_id }]
            }
            None => Vec::new(),
        },
        Msg::ThemeLoaded(theme) => {
            state.set_theme(theme);
            Vec::new()
        }
        Msg::ThemeToggled => {
            let theme = state.theme().toggled();
            state.set_theme(theme);
            vec![Effect::PersistTheme(theme)]
        }
    };

    (state, effects)
}

fn apply_status(state: &mut AppState, run_id: RunId, snapshot: StatusSnapshot) -> Vec<Effect> {
    if let Err(err) = state.apply_snapshot(&snapshot) {
        return fail_protocol(state, run_id, err);
    }
    if !snapshot.complete {
        return Vec::new();
    }

    let Some(handle) = state.take_run() else {
        return Vec::new();
    };
    let mut effects = vec![Effect::StopPolling {
        run_id: handle.run_id,
    }];
    state.set_current_task(
        snapshot
            .current_task
            .unwrap_or_else(|| TASK_FINISHED.to_string()),
    );

    match snapshot.error {
        Some(error) => {
            dashboard_warn!("{} parser reported an error: {}", handle.kind, error);
            state.fail_job(&error);
            effects.push(Effect::ShowAlert {
                severity: AlertSeverity::Error,
                message: format!("The parser reported an error: {error}"),
            });
        }
        None => {
            let summary = snapshot.summary.unwrap_or_default();
            dashboard_info!("{} parser finished: {:?}", handle.kind, summary);
            state.complete_job(summary);
        }
    }
    effects
}

fn fail_protocol(state: &mut AppState, run_id: RunId, err: ProtocolError) -> Vec<Effect> {
    dashboard_warn!("status stream for run {} is inconsistent: {}", run_id, err);
    if state.take_run().is_none() {
        return Vec::new();
    }
    state.fail_protocol(&err);
    vec![
        Effect::StopPolling { run_id },
        Effect::ShowAlert {
            severity: AlertSeverity::Error,
            message: format!("Status stream is inconsistent, polling stopped: {err}"),
        },
    ]
}
