//! Error types shared by the scanner, splitter and reconstructor.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure the engine can surface to a caller.
///
/// A failed frame-size detection is not an error: it is reported as `None`
/// so callers pick their own fallback.
#[derive(Debug, Error)]
pub enum BulkError {
    /// Configuration could not be read or did not validate. Callers usually
    /// log this and continue with the hardcoded defaults.
    #[error("configuration error in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// The sync word is not valid hex or decodes to zero bytes.
    #[error("invalid sync word {0:?}")]
    InvalidSyncWord(String),

    /// The input file does not exist.
    #[error("input file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O failure, with the file and the phase that failed.
    #[error("I/O error during {phase} of {path}: {source}")]
    Io {
        path: PathBuf,
        phase: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A parameter that can never produce a valid run (zero frame size, zero bulk cap).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl BulkError {
    /// Wrap an I/O error, mapping `NotFound` on open to [`BulkError::FileNotFound`].
    pub(crate) fn io(path: impl Into<PathBuf>, phase: &'static str, source: std::io::Error) -> Self {
        let path = path.into();
        if phase == "open" && source.kind() == std::io::ErrorKind::NotFound {
            return BulkError::FileNotFound(path);
        }
        BulkError::Io { path, phase, source }
    }
}

/// Result type alias using BulkError.
pub type Result<T> = std::result::Result<T, BulkError>;
