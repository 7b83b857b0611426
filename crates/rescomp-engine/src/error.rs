use std::io;

use rescomp_core::Cancelled;
use rescomp_index::RawLoadError;
use rescomp_output::OutputError;

/// Failures that abort a run without producing a report.
///
/// Semantic problems (bad manifest, bad data, template errors) are reported
/// through [`crate::RunReport`] warnings; only environmental failures and
/// cancellation surface here.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The run was cancelled.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
    /// Canonical JSON serialization failed.
    #[error("canonical serialization failed: {0}")]
    Serialize(String),
}

impl From<RawLoadError> for EngineError {
    fn from(err: RawLoadError) -> Self {
        match err {
            RawLoadError::Io(err) => Self::Io(err),
            RawLoadError::Cancelled(err) => Self::Cancelled(err),
        }
    }
}

impl From<OutputError> for EngineError {
    fn from(err: OutputError) -> Self {
        match err {
            OutputError::Io(err) => Self::Io(err),
            OutputError::Cancelled(err) => Self::Cancelled(err),
            OutputError::Serialize(message) => Self::Serialize(message),
        }
    }
}
