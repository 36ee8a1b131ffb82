use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlogError {
    #[error("Output buffer limit of {limit} bytes exceeded")]
    OutputOverflow { limit: usize },

    #[error("Output buffer allocation failed: {0}")]
    OutOfMemory(#[from] TryReserveError),

    #[error("Field tree nesting exceeds {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("Arena output buffer is already borrowed on this thread")]
    ArenaBusy,

    #[error("Unknown level token: {0}")]
    UnknownLevel(String),

    #[error("Sink I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SlogError {
    /// Resource exhaustion cannot be recovered from by dropping the line.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SlogError::OutOfMemory(_))
    }
}
