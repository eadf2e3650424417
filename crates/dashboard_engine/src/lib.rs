//! Dashboard engine: HTTP client for the admin endpoints, poll timers and the preference store.
mod client;
mod engine;
mod store;
mod types;

pub use client::{AdminClient, ClientSettings, ReqwestAdminClient};
pub use engine::EngineHandle;
pub use store::{PreferenceStore, StoreError};
pub use types::{
    EngineEvent, FailureKind, FetchError, RunId, StartAccepted, StartPayload, StatusPayload,
    SummaryPayload,
};
