use chrono::{DateTime, Utc};

use crate::{Accepted, JobKind, PollError, RunId, StatusSnapshot, Theme, TriggerError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator asked to run a parser.
    StartClicked { kind: JobKind },
    /// The start endpoint answered, or the request never got through.
    StartResponded {
        run_id: RunId,
        started_at: DateTime<Utc>,
        result: Result<Accepted, TriggerError>,
    },
    /// Poll timer fired for a run.
    PollDue { run_id: RunId },
    /// A status request finished.
    StatusReceived {
        run_id: RunId,
        dispatch: u64,
        result: Result<StatusSnapshot, PollError>,
    },
    /// Operator left the dashboard; stop following the job.
    CancelRequested,
    /// Theme read back from the preference store.
    ThemeLoaded(Theme),
    ThemeToggled,
}
