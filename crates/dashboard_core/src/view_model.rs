use crate::{JobHandle, Phase, RunSummary, Theme, TriggerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLineKind {
    /// A line taken verbatim from the job's own log.
    Entry,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
    pub kind: LogLineKind,
}

impl LogLine {
    pub fn entry(text: String) -> Self {
        Self {
            text,
            kind: LogLineKind::Entry,
        }
    }

    pub fn error(text: String) -> Self {
        Self {
            text,
            kind: LogLineKind::Error,
        }
    }

    pub fn success(text: String) -> Self {
        Self {
            text,
            kind: LogLineKind::Success,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub active_job: Option<JobHandle>,
    pub start_enabled: bool,
    pub progress_visible: bool,
    pub progress_percent: u8,
    pub current_task: String,
    pub log: Vec<LogLine>,
    /// Counts of the last successful run; kept until the next success replaces it.
    pub last_summary: Option<RunSummary>,
    pub last_trigger_error: Option<TriggerError>,
    pub theme: Theme,
}

impl AppViewModel {
    /// Text of the job's own log lines, without the terminal outcome line.
    pub fn log_entries(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter(|line| line.kind == LogLineKind::Entry)
            .map(|line| line.text.as_str())
            .collect()
    }
}
