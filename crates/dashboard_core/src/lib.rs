//! Dashboard core: pure job-trigger / status-polling state machine and view-model helpers.
mod cursor;
mod effect;
mod error;
mod job;
mod msg;
mod state;
mod theme;
mod update;
mod view_model;

pub use cursor::LogCursor;
pub use effect::{AlertSeverity, Effect};
pub use error::{PollError, ProtocolError, TriggerError};
pub use job::{
    Accepted, JobHandle, JobKind, RunId, RunSummary, StatusSnapshot, UnknownJobKind,
};
pub use msg::Msg;
pub use state::{AppState, FailureKind, Phase};
pub use theme::{Theme, UnknownTheme, THEME_KEY};
pub use update::update;
pub use view_model::{AppViewModel, LogLine, LogLineKind};
