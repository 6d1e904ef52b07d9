//! Error types for the Go installer CLI.
//!
//! Each stage of an install reports through its own error enum; this
//! module gathers them into [`InstallerError`] so the binary can print a
//! single message and choose an exit code.

use crate::archive::WalkError;
use crate::artefact::DownloadError;
use crate::catalog::CatalogError;
use thiserror::Error;

/// Errors that can occur during the installation process.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// No destination was given and unpacking was not disabled.
    #[error("no destination directory given; pass --ddir or set GOINSTALLDSTPATH, or use --nounpack")]
    MissingDestination,

    /// The release catalog could not be fetched or decoded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The catalog lists no archive for the requested platform.
    #[error("no archive for {os}/{arch} in release {version}")]
    ArtifactNotFound {
        /// Requested operating system.
        os: String,
        /// Requested architecture.
        arch: String,
        /// The release that was searched.
        version: String,
    },

    /// The archive could not be downloaded or failed verification.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The archive could not be read or extracted.
    #[error(transparent)]
    Archive(#[from] WalkError),

    /// A path from the command line could not be resolved.
    #[error("invalid path: {reason}")]
    InvalidPath {
        /// Description of the problem.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
