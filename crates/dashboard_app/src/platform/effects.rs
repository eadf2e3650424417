use std::time::Duration;

use chrono::Utc;
use dashboard_core::{
    Accepted, Effect, Msg, PollError, ProtocolError, RunSummary, StatusSnapshot, TriggerError,
};
use dashboard_engine::{
    EngineEvent, EngineHandle, FailureKind, FetchError, PreferenceStore, StartAccepted,
    StatusPayload,
};
use dashboard_logging::{dashboard_debug, dashboard_info};

use super::persistence;
use super::ui::{DisplaySurface, UiCommand};

/// Executes core effects against the engine, the preference store and the display.
pub struct EffectRunner {
    engine: EngineHandle,
    poll_interval: Duration,
    prefs: PreferenceStore,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, poll_interval: Duration, prefs: PreferenceStore) -> Self {
        engine.watch_interrupts();
        Self {
            engine,
            poll_interval,
            prefs,
        }
    }

    pub fn run(&self, effects: Vec<Effect>, surface: &mut dyn DisplaySurface) {
        for effect in effects {
            match effect {
                Effect::RequestStart { run_id, kind } => {
                    dashboard_info!("RequestStart run_id={} kind={}", run_id, kind);
                    self.engine.start(run_id, kind.as_str());
                }
                Effect::BeginPolling { run_id } => {
                    dashboard_info!(
                        "BeginPolling run_id={} interval={:?}",
                        run_id,
                        self.poll_interval
                    );
                    self.engine.begin_polling(run_id, self.poll_interval);
                }
                Effect::FetchStatus { run_id, dispatch } => {
                    dashboard_debug!("FetchStatus run_id={} dispatch={}", run_id, dispatch);
                    self.engine.fetch_status(run_id, dispatch);
                }
                Effect::StopPolling { run_id } => {
                    dashboard_info!("StopPolling run_id={}", run_id);
                    self.engine.stop_polling(run_id);
                }
                Effect::ShowAlert { severity, message } => {
                    surface.apply(UiCommand::Alert { severity, message });
                    surface.present();
                }
                Effect::PersistTheme(theme) => persistence::save_theme(&self.prefs, theme),
            }
        }
    }

    /// Waits up to `timeout` for the next engine event, translated into a core message.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StartFinished { run_id, result } => Msg::StartResponded {
            run_id,
            started_at: Utc::now(),
            result: map_start(result),
        },
        EngineEvent::PollDue { run_id } => Msg::PollDue { run_id },
        EngineEvent::StatusFetched {
            run_id,
            dispatch,
            result,
        } => Msg::StatusReceived {
            run_id,
            dispatch,
            result: map_status(result),
        },
        EngineEvent::Interrupted => Msg::CancelRequested,
    }
}

pub(crate) fn map_start(
    result: Result<StartAccepted, FetchError>,
) -> Result<Accepted, TriggerError> {
    match result {
        Ok(accepted) => Ok(Accepted {
            message: accepted.message,
        }),
        Err(err) => Err(match err.kind {
            FailureKind::Network => TriggerError::Network(err.message),
            FailureKind::Timeout | FailureKind::InvalidUrl => {
                TriggerError::Network(err.to_string())
            }
            FailureKind::HttpStatus(_) | FailureKind::Rejected | FailureKind::Decode => {
                TriggerError::Rejected(err.message)
            }
        }),
    }
}

pub(crate) fn map_status(
    result: Result<StatusPayload, FetchError>,
) -> Result<StatusSnapshot, PollError> {
    match result {
        Ok(payload) => Ok(StatusSnapshot {
            progress_percent: payload.progress_percent,
            current_task: payload.current_task,
            log: payload.log,
            complete: payload.complete,
            error: payload.error,
            summary: payload.summary.map(|summary| RunSummary {
                added: summary.added,
                updated: summary.updated,
                errors: summary.errors,
                skipped: summary.skipped,
            }),
        }),
        Err(err) => Err(match err.kind {
            FailureKind::HttpStatus(status) => PollError::Http {
                status,
                message: err.message,
            },
            FailureKind::Decode | FailureKind::Rejected => {
                PollError::Protocol(ProtocolError::Malformed(err.message))
            }
            FailureKind::Network => PollError::Network(err.message),
            FailureKind::Timeout | FailureKind::InvalidUrl => PollError::Network(err.to_string()),
        }),
    }
}
