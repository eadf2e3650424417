pub(crate) mod terminal;
pub(crate) mod render;

use dashboard_core::{AlertSeverity, JobKind, LogLine, RunSummary, Theme};

/// One update call against the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UiCommand {
    SetStartEnabled(bool),
    ShowProgress(bool),
    SetProgress(u8),
    SetCurrentTask(String),
    ClearLog,
    AppendLog(LogLine),
    ShowLastSummary(RunSummary),
    RunEnded { kind: JobKind, elapsed_secs: i64 },
    Alert {
        severity: AlertSeverity,
        message: String,
    },
    ApplyTheme(Theme),
}

/// Whatever shows the dashboard to the operator.
pub(crate) trait DisplaySurface {
    fn apply(&mut self, command: UiCommand);

    /// Called once after each batch of commands.
    fn present(&mut self) {}
}
