use crate::{JobKind, RunId, Theme};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST the start request for `kind`.
    RequestStart { run_id: RunId, kind: JobKind },
    /// Start the periodic poll timer for the run.
    BeginPolling { run_id: RunId },
    /// Issue one status request; `dispatch` orders the responses.
    FetchStatus { run_id: RunId, dispatch: u64 },
    /// Stop the poll timer. In-flight requests are left to finish.
    StopPolling { run_id: RunId },
    /// Blocking notification for the operator.
    ShowAlert {
        severity: AlertSeverity,
        message: String,
    },
    PersistTheme(Theme),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Warning,
    Error,
}
