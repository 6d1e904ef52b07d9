//! Integrity-checked artefact retrieval.
//!
//! # Sub-modules
//!
//! - [`download`] - Size- and digest-verified download with resume short-circuit.
//! - [`progress`] - Throttled progress reporting around a byte stream.
//! - [`sha256_digest`] - SHA-256 digest newtype and file hashing.

pub mod download;
pub mod progress;
pub mod sha256_digest;

pub use download::{DownloadError, DownloadOutcome, DownloadRequest, IntegrityDownloader};
pub use progress::{DEFAULT_PROGRESS_INTERVAL, ProgressReader, log_progress};
pub use sha256_digest::{DigestFormatError, Sha256Digest, compute_sha256};
