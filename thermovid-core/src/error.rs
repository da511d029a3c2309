//! Error types for the thermovid-core library.
//!
//! All fallible operations in this crate return [`CoreResult`]. Errors local
//! to a single recording's conversion are caught at the driver boundary in
//! [`crate::processing`] so that one bad file does not abort the batch.

use std::path::PathBuf;

use thiserror::Error;

/// Custom error types for thermovid
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read recording '{path}': {message}")]
    SourceRead { path: PathBuf, message: String },

    #[error("Video sink error: {0}")]
    SinkWrite(String),

    #[error("Recording contains no frames")]
    NoFrames,

    #[error("No .tseq recordings found in the input directory")]
    NoFilesFound,

    #[error("Colormap file not found: {0}")]
    ColormapNotFound(PathBuf),

    #[error("Failed to load colormap: {0}")]
    ColormapLoad(String),

    #[error("Retention copy failed: {0}")]
    RetentionCopy(String),

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("{0} failed: {1}")]
    CommandFailed(String, String),

    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Result type for thermovid operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Creates a `CoreError::SourceRead` for the given recording path.
pub(crate) fn source_read_error(path: &std::path::Path, message: impl Into<String>) -> CoreError {
    CoreError::SourceRead {
        path: path.to_path_buf(),
        message: message.into(),
    }
}
