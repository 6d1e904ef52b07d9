//! Integrity-checked artefact download.
//!
//! On success the destination path holds exactly the expected bytes: the
//! declared length, the written length, and the SHA-256 of the written
//! file are all checked. A file already on disk with the right size and
//! digest is accepted without any request. Failures leave whatever was
//! written on disk and are never retried here.

use super::progress::{DEFAULT_PROGRESS_INTERVAL, ProgressError, ProgressReader, log_progress};
use super::sha256_digest::{DigestFormatError, Sha256Digest, compute_sha256};
use crate::transport::{HttpTransport, TransportError};
use log::{debug, info};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Everything needed to fetch and verify one artefact.
#[derive(Debug, Clone, Copy)]
pub struct DownloadRequest<'a> {
    /// The URL to fetch.
    pub url: &'a str,
    /// Where the artefact is written.
    pub dest: &'a Path,
    /// Expected hex-encoded SHA-256 digest.
    pub sha256: &'a str,
    /// Expected size in bytes.
    pub size: u64,
}

/// How a successful download was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// A verified file was already present; no request was made.
    AlreadyPresent,
    /// The artefact was fetched and verified.
    Downloaded {
        /// Number of bytes written.
        bytes: u64,
    },
}

/// Errors arising from artefact download and verification.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The expected digest is not valid hex.
    #[error(transparent)]
    DigestFormat(#[from] DigestFormatError),

    /// The request could not be completed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a status other than 200.
    #[error("unwanted status code {status} for {url}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The status code received.
        status: u16,
    },

    /// The declared `Content-Length` differs from the expected size.
    #[error(
        "wrong size for {url} (expected {expected}, server declared {})",
        describe_length(*.declared)
    )]
    DeclaredSizeMismatch {
        /// The URL that was requested.
        url: String,
        /// The expected size in bytes.
        expected: u64,
        /// The length the server declared, if any.
        declared: Option<u64>,
    },

    /// Copying the response body to disk failed.
    #[error("transfer from {url} failed: {source}")]
    Transfer {
        /// The URL that was requested.
        url: String,
        /// The underlying read or write failure.
        #[source]
        source: io::Error,
    },

    /// The number of bytes written differs from the expected size.
    #[error("wrong size written (expected {expected}, got {written})")]
    WrittenSizeMismatch {
        /// The expected size in bytes.
        expected: u64,
        /// The number of bytes actually written.
        written: u64,
    },

    /// The written file does not hash to the expected digest.
    #[error("file downloaded but sha256 does not match (expected {expected}, got {actual})")]
    HashMismatch {
        /// The expected digest.
        expected: Sha256Digest,
        /// The digest of the written file.
        actual: Sha256Digest,
    },

    /// A local file operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file being created or hashed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

fn describe_length(declared: Option<u64>) -> String {
    declared.map_or_else(|| "no length".to_owned(), |n| n.to_string())
}

/// Downloads artefacts through an [`HttpTransport`] and verifies them.
///
/// # Examples
///
/// ```no_run
/// use goinstall::artefact::{DownloadRequest, IntegrityDownloader};
/// use goinstall::transport::UreqTransport;
/// use std::path::Path;
///
/// let downloader = IntegrityDownloader::new(&UreqTransport);
/// let request = DownloadRequest {
///     url: "https://go.dev/dl/go1.21.4.linux-amd64.tar.gz",
///     dest: Path::new("/tmp/go1.21.4.linux-amd64.tar.gz"),
///     sha256: "73cac0215254d0c7d1241fa40837851f3b9a8a742d0b54714cbdfb3feaf8f0af",
///     size: 66_615_271,
/// };
/// downloader.download(&request).expect("verified download");
/// ```
pub struct IntegrityDownloader<'t> {
    transport: &'t dyn HttpTransport,
    progress_interval: Duration,
}

impl<'t> IntegrityDownloader<'t> {
    /// Create a downloader issuing requests through `transport`.
    #[must_use]
    pub fn new(transport: &'t dyn HttpTransport) -> Self {
        Self {
            transport,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Replace the minimum interval between progress reports.
    #[must_use]
    pub const fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Download and verify, logging progress for the request URL.
    ///
    /// # Errors
    ///
    /// See [`IntegrityDownloader::download_with_progress`].
    pub fn download(
        &self,
        request: &DownloadRequest<'_>,
    ) -> Result<DownloadOutcome, DownloadError> {
        self.download_with_progress(request, log_progress(request.url))
    }

    /// Download and verify, reporting progress through `report`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::DigestFormat`] before any network access
    /// when the expected digest is malformed. Otherwise returns the
    /// variant for the first failed check: transport, status, declared
    /// size, transfer, written size, or digest.
    pub fn download_with_progress<F>(
        &self,
        request: &DownloadRequest<'_>,
        report: F,
    ) -> Result<DownloadOutcome, DownloadError>
    where
        F: FnMut(u64, Option<u64>) -> Result<(), ProgressError>,
    {
        let expected = Sha256Digest::try_from(request.sha256)?;

        if existing_file_matches(request.dest, request.size, &expected) {
            info!(
                "found {} with proper size and proper sha256",
                request.dest.display()
            );
            return Ok(DownloadOutcome::AlreadyPresent);
        }

        info!("requesting {}", request.url);
        let response = self.transport.get(request.url)?;
        if response.status != 200 {
            return Err(DownloadError::Status {
                url: request.url.to_owned(),
                status: response.status,
            });
        }
        if response.content_length != Some(request.size) {
            return Err(DownloadError::DeclaredSizeMismatch {
                url: request.url.to_owned(),
                expected: request.size,
                declared: response.content_length,
            });
        }

        info!(
            "downloading {} ({} bytes) to {}",
            request.url,
            request.size,
            request.dest.display()
        );
        let written = {
            let mut file = fs::File::create(request.dest)
                .map_err(|source| io_error(request.dest, source))?;
            let mut reader = ProgressReader::new(response.body, Some(request.size), report)
                .with_interval(self.progress_interval);
            io::copy(&mut reader, &mut file).map_err(|source| DownloadError::Transfer {
                url: request.url.to_owned(),
                source,
            })?
        };

        if written != request.size {
            return Err(DownloadError::WrittenSizeMismatch {
                expected: request.size,
                written,
            });
        }

        let actual =
            compute_sha256(request.dest).map_err(|source| io_error(request.dest, source))?;
        if actual != expected {
            return Err(DownloadError::HashMismatch { expected, actual });
        }

        debug!("verified {} ({written} bytes)", request.dest.display());
        Ok(DownloadOutcome::Downloaded { bytes: written })
    }
}

/// Return true when `path` already holds `size` bytes hashing to `expected`.
fn existing_file_matches(path: &Path, size: u64, expected: &Sha256Digest) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() || metadata.len() != size {
        return false;
    }
    match compute_sha256(path) {
        Ok(actual) => actual == *expected,
        Err(err) => {
            debug!("could not hash existing {}: {err}", path.display());
            false
        }
    }
}

fn io_error(path: &Path, source: io::Error) -> DownloadError {
    DownloadError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "download_tests.rs"]
mod tests;
