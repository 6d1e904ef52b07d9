//! Error types for archive traversal.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors a handler may return for a single entry.
#[derive(Debug, Error)]
pub enum EntryError {
    /// I/O error while handling the entry.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The entry name would resolve outside the destination root.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending entry name.
        path: String,
    },
}

/// Errors that abort a walk.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The archive file could not be opened.
    #[error("failed to open archive {}: {source}", .path.display())]
    Open {
        /// The archive path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The stream is not a readable tar (or gzip-compressed tar) archive.
    ///
    /// Raised regardless of the error policy.
    #[error("corrupt archive stream: {0}")]
    Structural(#[source] io::Error),

    /// A handler failed under [`ErrorPolicy::StopOnError`](super::ErrorPolicy::StopOnError).
    #[error("failed to process entry {}: {source}", .path.display())]
    Handler {
        /// The entry being handled.
        path: PathBuf,
        /// The handler's error.
        #[source]
        source: EntryError,
    },
}
