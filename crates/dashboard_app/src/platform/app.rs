use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use dashboard_core::{update, AppState, AppViewModel, Effect, FailureKind, JobKind, Msg, Phase};
use dashboard_engine::{EngineEvent, EngineHandle, PreferenceStore};
use dashboard_logging::{dashboard_info, dashboard_warn};

use super::effects::{map_status, EffectRunner};
use super::persistence;
use super::ui::render::render;
use super::ui::terminal::Console;
use super::ui::{DisplaySurface, UiCommand};
use crate::cli::ThemeAction;
use crate::config::DashboardConfig;

/// How long the event loop waits for engine events before re-checking state.
const EVENT_WAIT: Duration = Duration::from_millis(250);

/// How a followed run ended, as far as the process exit status is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    StartFailed,
    JobFailed,
    ProtocolFailed,
    Cancelled,
}

impl RunOutcome {
    fn from_state(state: &AppState) -> Self {
        match state.phase() {
            Phase::Completed => RunOutcome::Completed,
            Phase::Failed(FailureKind::Job) => RunOutcome::JobFailed,
            Phase::Failed(FailureKind::Protocol) => RunOutcome::ProtocolFailed,
            Phase::Idle if state.view().last_trigger_error.is_some() => RunOutcome::StartFailed,
            Phase::Idle | Phase::Starting { .. } | Phase::Polling => RunOutcome::Cancelled,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        match self {
            RunOutcome::Completed => ExitCode::SUCCESS,
            RunOutcome::StartFailed => ExitCode::from(1),
            RunOutcome::JobFailed => ExitCode::from(2),
            RunOutcome::ProtocolFailed => ExitCode::from(3),
            RunOutcome::Cancelled => ExitCode::from(130),
        }
    }
}

/// Owns the single `AppState` and feeds it one message at a time.
struct Dashboard<S: DisplaySurface> {
    state: AppState,
    shown: AppViewModel,
    runner: EffectRunner,
    surface: S,
}

impl<S: DisplaySurface> Dashboard<S> {
    fn new(runner: EffectRunner, surface: S) -> Self {
        let state = AppState::new();
        let shown = state.view();
        Self {
            state,
            shown,
            runner,
            surface,
        }
    }

    fn is_busy(&self) -> bool {
        !self.state.can_start()
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            for command in render(&self.shown, &view, Utc::now()) {
                self.surface.apply(command);
            }
            self.surface.present();
            self.shown = view;
        }
        dashboard_logging::set_active_run(state.active_job().map_or(0, |job| job.run_id));
        self.state = state;
        self.runner.run(effects, &mut self.surface);
    }
}

/// Starts `kind` and follows it until it finishes, fails, or the operator interrupts.
pub fn run_job(config: &DashboardConfig, kind: JobKind) -> Result<RunOutcome> {
    let prefs = PreferenceStore::new(&config.prefs_path);
    let theme = persistence::load_theme(&prefs);
    let engine = EngineHandle::new(config.client_settings())
        .map_err(|err| anyhow!("failed to set up the HTTP client: {err}"))?;
    let runner = EffectRunner::new(engine, config.poll_interval(), prefs);
    let mut dashboard = Dashboard::new(runner, Console::new(io::stdout()));

    dashboard.dispatch(Msg::ThemeLoaded(theme));
    dashboard_info!("running {} against {}", kind, config.base_url);
    dashboard.dispatch(Msg::StartClicked { kind });

    while dashboard.is_busy() {
        if let Some(msg) = dashboard.runner.next_msg(EVENT_WAIT) {
            dashboard.dispatch(msg);
        }
    }

    let outcome = RunOutcome::from_state(&dashboard.state);
    dashboard_info!("run finished with {:?}", outcome);
    Ok(outcome)
}

/// Fetches and prints the status endpoint once.
pub fn show_status(config: &DashboardConfig) -> Result<()> {
    let engine = EngineHandle::new(config.client_settings())
        .map_err(|err| anyhow!("failed to set up the HTTP client: {err}"))?;
    engine.fetch_status(0, 0);

    let wait = Duration::from_millis(config.request_timeout_ms) + Duration::from_secs(5);
    let result = loop {
        match engine.recv_timeout(wait) {
            Some(EngineEvent::StatusFetched { result, .. }) => break result,
            Some(_) => continue,
            None => return Err(anyhow!("no status response within {wait:?}")),
        }
    };
    let snapshot = map_status(result).context("status request failed")?;

    let mut surface = Console::new(io::stdout());
    let theme = persistence::load_theme(&PreferenceStore::new(&config.prefs_path));
    surface.apply(UiCommand::ApplyTheme(theme));
    surface.print_snapshot(&snapshot);
    Ok(())
}

/// Shows or changes the stored theme through the core state machine.
pub fn theme_command(config: &DashboardConfig, action: Option<ThemeAction>) -> Result<()> {
    let prefs = PreferenceStore::new(&config.prefs_path);
    let current = persistence::load_theme(&prefs);
    let (state, _) = update(AppState::new(), Msg::ThemeLoaded(current));

    let (state, effects) = match action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => (state, Vec::new()),
        ThemeAction::Toggle => update(state, Msg::ThemeToggled),
        ThemeAction::Set { theme } if theme == state.theme() => (state, Vec::new()),
        ThemeAction::Set { .. } => update(state, Msg::ThemeToggled),
    };
    for effect in effects {
        match effect {
            Effect::PersistTheme(theme) => persistence::save_theme(&prefs, theme),
            other => dashboard_warn!("unexpected effect from theme change: {:?}", other),
        }
    }

    println!("theme: {}", state.theme());
    Ok(())
}
