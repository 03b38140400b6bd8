use std::io;

use thiserror::Error;

use crate::padding::PaddingError;

/// Unified error for the stream façade.
/// - `From<T>` impls enable `?` across engine and I/O layers.
/// - Engine errors that travelled through an adapter's `io::Error` are
///   unwrapped back into `Padding`.
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error from the source or the sink.
    #[error("I/O error: {0}")]
    Io(io::Error),

    /// Engine error (construction, alignment, padding, misuse).
    #[error("padding error: {0}")]
    Padding(#[from] PaddingError),

    /// Generic high-level validation with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        match PaddingError::from_io(&e) {
            Some(inner) => StreamError::Padding(inner.clone()),
            None => StreamError::Io(e),
        }
    }
}

impl StreamError {
    pub fn padding(&self) -> Option<&PaddingError> {
        match self {
            StreamError::Padding(e) => Some(e),
            _ => None,
        }
    }
}
