//! Sequential traversal of a tar stream with pluggable entry handlers.
//!
//! The stream is sniffed for the gzip magic bytes and transparently
//! decompressed before being read as tar. Each entry's metadata and a
//! reader bounded to that entry's payload are passed to the handler; the
//! reader cannot outlive the call because the walker moves past it
//! afterwards.
//!
//! A read failure on an entry's payload means the stream itself is
//! corrupt. The walker reports it as [`WalkError::Structural`] under every
//! policy, even when the handler surfaced it as its own error.

use super::entry::ArchiveEntry;
use super::error::{EntryError, WalkError};
use flate2::read::GzDecoder;
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Leading bytes of every gzip member.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Per-entry callback driven by [`walk`].
pub trait EntryHandler {
    /// Handle one entry. `contents` yields exactly the entry's payload.
    ///
    /// # Errors
    ///
    /// Returns an [`EntryError`]; what the walk does with it depends on
    /// the [`ErrorPolicy`].
    fn handle(&mut self, entry: &ArchiveEntry, contents: &mut dyn Read) -> Result<(), EntryError>;
}

impl<F> EntryHandler for F
where
    F: FnMut(&ArchiveEntry, &mut dyn Read) -> Result<(), EntryError>,
{
    fn handle(&mut self, entry: &ArchiveEntry, contents: &mut dyn Read) -> Result<(), EntryError> {
        self(entry, contents)
    }
}

/// What a walk does when a handler fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorPolicy {
    /// Abort on the first handler error and return it.
    #[default]
    StopOnError,
    /// Record the error in the [`WalkReport`] and move to the next entry.
    ContinueOnError,
}

/// A handler failure recorded under [`ErrorPolicy::ContinueOnError`].
#[derive(Debug)]
pub struct EntryFailure {
    /// The entry that failed.
    pub path: PathBuf,
    /// The handler's error.
    pub error: EntryError,
}

/// Summary of a completed walk.
#[derive(Debug, Default)]
pub struct WalkReport {
    entries: usize,
    failures: Vec<EntryFailure>,
}

impl WalkReport {
    /// Return how many entries were handed to the handler.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// Return the per-entry failures, in archive order.
    #[must_use]
    pub fn failures(&self) -> &[EntryFailure] {
        &self.failures
    }

    /// Return true when no handler call failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Walk the archive in `source`, calling `handler` for every entry.
///
/// Clean end of stream finishes the walk. Under
/// [`ErrorPolicy::ContinueOnError`] handler errors are collected in the
/// returned report instead of stopping the walk.
///
/// # Errors
///
/// Returns [`WalkError::Structural`] for a corrupt stream, whatever the
/// policy, and [`WalkError::Handler`] for the first handler error under
/// [`ErrorPolicy::StopOnError`].
///
/// # Examples
///
/// ```
/// use goinstall::archive::{ArchiveEntry, EntryError, ErrorPolicy, walk};
/// use std::io::Read;
///
/// let mut builder = tar::Builder::new(Vec::new());
/// let mut header = tar::Header::new_gnu();
/// header.set_size(5);
/// header.set_mode(0o644);
/// header.set_cksum();
/// builder.append_data(&mut header, "hello.txt", &b"hello"[..]).expect("append");
/// let bytes = builder.into_inner().expect("finish");
///
/// let mut names = Vec::new();
/// let mut handler = |entry: &ArchiveEntry, _contents: &mut dyn Read| -> Result<(), EntryError> {
///     names.push(entry.path().display().to_string());
///     Ok(())
/// };
/// let report = walk(bytes.as_slice(), &mut handler, ErrorPolicy::StopOnError).expect("walk");
/// assert_eq!(report.entries(), 1);
/// assert_eq!(names, ["hello.txt"]);
/// ```
pub fn walk<R: Read>(
    source: R,
    handler: &mut dyn EntryHandler,
    policy: ErrorPolicy,
) -> Result<WalkReport, WalkError> {
    let mut buffered = BufReader::new(source);
    let is_gzip = buffered
        .fill_buf()
        .map_err(WalkError::Structural)?
        .starts_with(&GZIP_MAGIC);
    if is_gzip {
        debug!("gzip stream detected");
        walk_tar(GzDecoder::new(buffered), handler, policy)
    } else {
        walk_tar(buffered, handler, policy)
    }
}

/// Open the archive at `path` and [`walk`] it.
///
/// # Errors
///
/// Returns [`WalkError::Open`] if the file cannot be opened, otherwise
/// the errors of [`walk`].
pub fn walk_file(
    path: &Path,
    handler: &mut dyn EntryHandler,
    policy: ErrorPolicy,
) -> Result<WalkReport, WalkError> {
    let file = File::open(path).map_err(|source| WalkError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    walk(file, handler, policy)
}

fn walk_tar<R: Read>(
    reader: R,
    handler: &mut dyn EntryHandler,
    policy: ErrorPolicy,
) -> Result<WalkReport, WalkError> {
    let mut archive = tar::Archive::new(reader);
    let mut report = WalkReport::default();

    for entry_result in archive.entries().map_err(WalkError::Structural)? {
        let mut entry = entry_result.map_err(WalkError::Structural)?;
        let view = ArchiveEntry::from_tar(&entry).map_err(WalkError::Structural)?;
        report.entries += 1;

        let mut contents = StreamGuard::new(&mut entry);
        let outcome = handler.handle(&view, &mut contents);
        if let Some(fault) = contents.fault {
            return Err(WalkError::Structural(fault));
        }
        let Err(error) = outcome else {
            continue;
        };
        match policy {
            ErrorPolicy::StopOnError => {
                return Err(WalkError::Handler {
                    path: view.path().to_path_buf(),
                    source: error,
                });
            }
            ErrorPolicy::ContinueOnError => {
                warn!("skipping entry {}: {error}", view.path().display());
                report.failures.push(EntryFailure {
                    path: view.path().to_path_buf(),
                    error,
                });
            }
        }
    }

    Ok(report)
}

/// Payload reader that remembers the first stream failure.
///
/// The handler receives a copy of the error so it can still bail out; the
/// original is kept for the walker.
struct StreamGuard<'a, R> {
    inner: &'a mut R,
    fault: Option<io::Error>,
}

impl<'a, R: Read> StreamGuard<'a, R> {
    const fn new(inner: &'a mut R) -> Self {
        Self { inner, fault: None }
    }
}

impl<R: Read> Read for StreamGuard<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf) {
            Err(err) if err.kind() != io::ErrorKind::Interrupted => {
                let copy = io::Error::new(err.kind(), err.to_string());
                self.fault.get_or_insert(err);
                Err(copy)
            }
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
