//! Go release installer library.
//!
//! This crate fetches the go.dev release catalog, selects the newest stable
//! release, downloads the archive for a platform with size and SHA-256
//! verification, and unpacks it safely. It is used by the `goinstall` CLI
//! binary and can be consumed programmatically with an injected HTTP
//! transport.
//!
//! # Diagnostics
//!
//! Components report diagnostics through the [`log`] facade rather than a
//! sink parameter. Library callers see them once they install a logger;
//! the `goinstall` binary installs `env_logger` at the level chosen by
//! `-v`/`-q`, overridable with `RUST_LOG`.
//!
//! # Modules
//!
//! - [`archive`] - Streaming tar/gzip traversal, statistics, and extraction
//! - [`artefact`] - Integrity-checked downloads with progress reporting
//! - [`catalog`] - Release catalog model, version ordering, and selection
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Top-level error type for an install run
//! - [`install_flow`] - End-to-end install orchestration
//! - [`output`] - Progress and summary lines for stderr
//! - [`platform`] - Host platform names in Go's naming scheme
//! - [`transport`] - HTTP seam shared by catalog fetch and downloads

pub mod archive;
pub mod artefact;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod install_flow;
pub mod output;
pub mod platform;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod transport;
