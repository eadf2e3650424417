use crate::ProtocolError;

/// Count of log lines already rendered for the active run.
///
/// Never moves backwards; a fresh cursor is created for every new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogCursor(usize);

impl LogCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(self) -> usize {
        self.0
    }

    /// Returns the lines of `log` that have not been rendered yet and moves
    /// the cursor past them.
    ///
    /// A log shorter than the cursor means the server dropped lines we have
    /// already shown; the cursor is left untouched in that case.
    pub fn advance<'a>(&mut self, log: &'a [String]) -> Result<&'a [String], ProtocolError> {
        if log.len() < self.0 {
            return Err(ProtocolError::LogShrank {
                cursor: self.0,
                len: log.len(),
            });
        }
        let fresh = &log[self.0..];
        self.0 = log.len();
        Ok(fresh)
    }
}
