use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Session-local identifier of one trigger-to-completion cycle.
pub type RunId = u64;

/// The parsers the admin backend knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Olx,
    Krisha,
}

impl JobKind {
    /// Path segment used by the start endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::Olx => "olx",
            JobKind::Krisha => "krisha",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            JobKind::Olx => "OLX.kz",
            JobKind::Krisha => "Krisha.kz",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job kind `{0}` (expected one of: olx, krisha)")]
pub struct UnknownJobKind(pub String);

impl FromStr for JobKind {
    type Err = UnknownJobKind;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "olx" => Ok(JobKind::Olx),
            "krisha" => Ok(JobKind::Krisha),
            _ => Err(UnknownJobKind(raw.to_string())),
        }
    }
}

/// The one job this session is currently following.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub run_id: RunId,
    pub kind: JobKind,
    pub started_at: DateTime<Utc>,
}

/// Successful answer of the start endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Accepted {
    pub message: Option<String>,
}

/// Counts reported by a successfully finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub added: u64,
    pub updated: u64,
    pub errors: u64,
    pub skipped: u64,
}

/// One poll response, already decoded from the wire.
///
/// `log` only ever grows across the life of a job: every snapshot's log is a
/// prefix-extension of the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub progress_percent: i64,
    pub current_task: Option<String>,
    pub log: Vec<String>,
    pub complete: bool,
    pub error: Option<String>,
    pub summary: Option<RunSummary>,
}
