use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub type RunId = u64;

/// Body of `POST <prefix>/run/<job>`, for both success and error statuses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StartPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartAccepted {
    pub message: Option<String>,
}

/// Body of `GET <prefix>/status`.
///
/// `progress_percent`, `log` and `complete` are required; a payload without
/// them fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusPayload {
    pub progress_percent: i64,
    #[serde(default)]
    pub current_task: Option<String>,
    pub log: Vec<String>,
    pub complete: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_summary")]
    pub summary: Option<SummaryPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryPayload {
    pub added: u64,
    pub updated: u64,
    pub errors: u64,
    pub skipped: u64,
}

/// A failed run reports its counts as `"N/A"`. Any count that is not a
/// non-negative integer reads as 0, and a summary that is not an object is
/// treated as absent.
fn lenient_summary<'de, D>(deserializer: D) -> Result<Option<SummaryPayload>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_object).map(|fields| {
        let count = |name: &str| fields.get(name).and_then(Value::as_u64).unwrap_or(0);
        SummaryPayload {
            added: count("added"),
            updated: count("updated"),
            errors: count("errors"),
            skipped: count("skipped"),
        }
    }))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StartFinished {
        run_id: RunId,
        result: Result<StartAccepted, FetchError>,
    },
    PollDue {
        run_id: RunId,
    },
    StatusFetched {
        run_id: RunId,
        dispatch: u64,
        result: Result<StatusPayload, FetchError>,
    },
    /// The operator pressed Ctrl-C.
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// The body was not the JSON shape the endpoint promises.
    Decode,
    /// 2xx start answer whose status is not `started`.
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Rejected => write!(f, "rejected"),
        }
    }
}
