use chrono::{DateTime, Utc};

use crate::view_model::{AppViewModel, LogLine};
use crate::{
    JobHandle, JobKind, LogCursor, PollError, ProtocolError, RunId, RunSummary, StatusSnapshot,
    Theme, TriggerError,
};

pub(crate) const TASK_SENDING_START: &str = "Sending start request to the parser...";
pub(crate) const TASK_WAITING_FIRST_STATUS: &str =
    "Parser started, waiting for the first status update...";
pub(crate) const TASK_NONE: &str = "No current task.";
pub(crate) const TASK_FINISHED: &str = "Task finished.";

/// Where the dashboard is in the trigger/poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Start request sent, no answer yet.
    Starting { run_id: RunId, kind: JobKind },
    /// A job handle is active and the poll loop runs.
    Polling,
    Completed,
    Failed(FailureKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The job itself reported an error.
    Job,
    /// The status stream was malformed or inconsistent.
    Protocol,
}

/// Poller bookkeeping owned by exactly one run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveRun {
    handle: JobHandle,
    cursor: LogCursor,
    /// Dispatch tag of the most recently issued status request.
    dispatched: u64,
    /// Dispatch tag of the most recently applied response.
    last_applied: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: Phase,
    last_run_id: RunId,
    run: Option<ActiveRun>,
    progress_visible: bool,
    progress_percent: u8,
    current_task: String,
    log: Vec<LogLine>,
    last_summary: Option<RunSummary>,
    last_trigger_error: Option<TriggerError>,
    theme: Theme,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn active_job(&self) -> Option<&JobHandle> {
        self.run.as_ref().map(|run| &run.handle)
    }

    pub fn log_cursor(&self) -> Option<LogCursor> {
        self.run.as_ref().map(|run| run.cursor)
    }

    /// Start affordances are enabled unless a start is in flight or a job is followed.
    pub fn can_start(&self) -> bool {
        !matches!(self.phase, Phase::Starting { .. } | Phase::Polling)
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            active_job: self.active_job().cloned(),
            start_enabled: self.can_start(),
            progress_visible: self.progress_visible,
            progress_percent: self.progress_percent,
            current_task: self.current_task.clone(),
            log: self.log.clone(),
            last_summary: self.last_summary,
            last_trigger_error: self.last_trigger_error.clone(),
            theme: self.theme,
        }
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn reject_busy(&mut self) {
        self.last_trigger_error = Some(TriggerError::Busy);
        self.dirty = true;
    }

    /// Moves to `Starting`, resetting the transient display. Returns the run id
    /// the start request is tagged with.
    pub(crate) fn begin_starting(&mut self, kind: JobKind) -> RunId {
        self.last_run_id += 1;
        let run_id = self.last_run_id;
        self.phase = Phase::Starting { run_id, kind };
        self.run = None;
        self.progress_visible = true;
        self.progress_percent = 0;
        self.current_task = TASK_SENDING_START.to_string();
        self.log.clear();
        self.last_trigger_error = None;
        self.dirty = true;
        run_id
    }

    pub(crate) fn accept_start(
        &mut self,
        run_id: RunId,
        kind: JobKind,
        started_at: DateTime<Utc>,
        message: Option<String>,
    ) {
        self.run = Some(ActiveRun {
            handle: JobHandle {
                run_id,
                kind,
                started_at,
            },
            cursor: LogCursor::new(),
            dispatched: 0,
            last_applied: 0,
        });
        self.phase = Phase::Polling;
        self.current_task = message.unwrap_or_else(|| TASK_WAITING_FIRST_STATUS.to_string());
        self.dirty = true;
    }

    pub(crate) fn abort_start(&mut self, err: TriggerError) {
        self.phase = Phase::Idle;
        self.current_task = format!("Start failed: {err}");
        self.last_trigger_error = Some(err);
        self.dirty = true;
    }

    /// Allocates the next dispatch tag for `run_id`, if that run is still active.
    pub(crate) fn dispatch_poll(&mut self, run_id: RunId) -> Option<u64> {
        let run = self
            .run
            .as_mut()
            .filter(|run| run.handle.run_id == run_id)?;
        run.dispatched += 1;
        Some(run.dispatched)
    }

    /// Gate for every status response: the run must still be active and no
    /// later-dispatched response may have been applied already. Claims the
    /// dispatch slot when it passes.
    pub(crate) fn claim_response(&mut self, run_id: RunId, dispatch: u64) -> bool {
        match self.run.as_mut() {
            Some(run)
                if run.handle.run_id == run_id
                    && dispatch > run.last_applied
                    && dispatch <= run.dispatched =>
            {
                run.last_applied = dispatch;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn note_poll_failure(&mut self, err: &PollError) {
        self.current_task = format!("Status update failed: {err}");
        self.dirty = true;
    }

    /// Applies progress, task text and the unseen part of the log.
    ///
    /// Nothing is rendered when the snapshot's log is shorter than the cursor.
    pub(crate) fn apply_snapshot(&mut self, snapshot: &StatusSnapshot) -> Result<(), ProtocolError> {
        let Some(run) = self.run.as_mut() else {
            return Ok(());
        };
        let fresh = run.cursor.advance(&snapshot.log)?;
        self.log.extend(fresh.iter().cloned().map(LogLine::entry));
        self.progress_percent = snapshot.progress_percent.clamp(0, 100) as u8;
        self.current_task = snapshot
            .current_task
            .clone()
            .unwrap_or_else(|| TASK_NONE.to_string());
        self.dirty = true;
        Ok(())
    }

    /// Drops the active run. Taking it out of the state is what makes the
    /// terminal transition happen at most once per run.
    pub(crate) fn take_run(&mut self) -> Option<JobHandle> {
        self.run.take().map(|run| run.handle)
    }

    pub(crate) fn set_current_task(&mut self, task: String) {
        self.current_task = task;
        self.dirty = true;
    }

    pub(crate) fn complete_job(&mut self, summary: RunSummary) {
        self.phase = Phase::Completed;
        self.log.push(LogLine::success(format!(
            "DONE: added {}, updated {}, errors {}, skipped {}",
            summary.added, summary.updated, summary.errors, summary.skipped
        )));
        self.last_summary = Some(summary);
        self.dirty = true;
    }

    pub(crate) fn fail_job(&mut self, error: &str) {
        self.phase = Phase::Failed(FailureKind::Job);
        self.log.push(LogLine::error(format!("ERROR: {error}")));
        self.dirty = true;
    }

    pub(crate) fn fail_protocol(&mut self, err: &ProtocolError) {
        self.phase = Phase::Failed(FailureKind::Protocol);
        self.log.push(LogLine::error(format!("PROTOCOL ERROR: {err}")));
        self.dirty = true;
    }

    /// Stops following the current job or abandons a pending start.
    /// Display text is left as it was.
    pub(crate) fn cancel(&mut self) -> Option<RunId> {
        match self.phase {
            Phase::Polling => {
                let run_id = self.take_run().map(|handle| handle.run_id);
                self.phase = Phase::Idle;
                self.dirty = true;
                run_id
            }
            Phase::Starting { .. } => {
                self.phase = Phase::Idle;
                self.dirty = true;
                None
            }
            Phase::Idle | Phase::Completed | Phase::Failed(_) => None,
        }
    }

    pub(crate) fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            self.theme = theme;
            self.dirty = true;
        }
    }
}
