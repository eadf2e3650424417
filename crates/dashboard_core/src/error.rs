use thiserror::Error;

/// Why a start request did not hand over to the poller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    /// Refused locally: a start is in flight or a job is being followed.
    #[error("a parser run is already in progress")]
    Busy,
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {status}: {message}")]
    Http { status: u16, message: String },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl PollError {
    /// Transient failures leave the poll loop running.
    pub fn is_transient(&self) -> bool {
        !matches!(self, PollError::Protocol(_))
    }
}

/// The status stream contradicts itself; rendering it would corrupt the log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("status log shrank from {cursor} to {len} lines")]
    LogShrank { cursor: usize, len: usize },
    #[error("malformed status payload: {0}")]
    Malformed(String),
}
