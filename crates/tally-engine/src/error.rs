//! Error types for the sampling engine.

use std::fmt;
use std::io;

use tally_core::SourceError;

/// Errors that can occur while collecting one sample.
///
/// These never escape the collector's public surface: the boundary methods
/// log them and drop the sample. They exist so the inner pipeline can use
/// plain `Result` control flow.
#[derive(Debug)]
pub enum CollectError {
    /// Reading the counter snapshot from the runtime failed.
    Source(SourceError),
    /// Writing or flushing the output sink failed.
    Io(io::Error),
}

impl fmt::Display for CollectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "counter read failed: {e}"),
            Self::Io(e) => write!(f, "sink I/O failed: {e}"),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}

impl From<SourceError> for CollectError {
    fn from(e: SourceError) -> Self {
        Self::Source(e)
    }
}

impl From<io::Error> for CollectError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn source_errors_chain() {
        let e = CollectError::from(SourceError::Runtime {
            detail: "gone".to_string(),
        });
        assert!(e.to_string().contains("counter read failed"));
        assert!(e.source().is_some());
    }

    #[test]
    fn io_errors_chain() {
        let e = CollectError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"));
        assert!(e.to_string().contains("sink I/O failed"));
        assert!(e.source().is_some());
    }
}
