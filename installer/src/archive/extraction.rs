//! Archive extraction beneath a destination root.
//!
//! Directories and regular files are materialised; links and other
//! special entries are skipped. Every entry name is checked before it is
//! joined onto the destination so that `..` segments and absolute paths
//! cannot write outside it (zip-slip).

use super::entry::{ArchiveEntry, EntryKind};
use super::error::{EntryError, WalkError};
use super::walker::{EntryHandler, ErrorPolicy, WalkReport, walk_file};
use log::debug;
use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

/// Permission bits for directories created during extraction.
#[cfg(unix)]
const DEFAULT_DIR_MODE: u32 = 0o755;

/// Permission bits honoured from the archive header.
#[cfg(unix)]
const PERMISSION_MASK: u32 = 0o7777;

/// Walk handler that writes entries beneath a destination directory.
///
/// # Examples
///
/// ```no_run
/// use goinstall::archive::{ErrorPolicy, Extractor, walk_file};
/// use std::path::Path;
///
/// let mut extractor = Extractor::new("/usr/local");
/// walk_file(
///     Path::new("/tmp/go1.21.4.linux-amd64.tar.gz"),
///     &mut extractor,
///     ErrorPolicy::StopOnError,
/// )
/// .expect("extract");
/// ```
#[derive(Debug)]
pub struct Extractor {
    destination: PathBuf,
    files_written: u64,
}

impl Extractor {
    /// Create an extractor rooted at `destination`.
    #[must_use]
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            files_written: 0,
        }
    }

    /// Return the destination root.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Return how many regular files have been written.
    #[must_use]
    pub const fn files_written(&self) -> u64 {
        self.files_written
    }

    fn target_for(&self, name: &Path) -> Result<PathBuf, EntryError> {
        validate_entry_path(name)?;
        Ok(self.destination.join(name))
    }
}

impl EntryHandler for Extractor {
    fn handle(&mut self, entry: &ArchiveEntry, contents: &mut dyn Read) -> Result<(), EntryError> {
        match entry.kind() {
            EntryKind::Directory => {
                let target = self.target_for(entry.path())?;
                if !target.exists() {
                    create_dirs(&target)?;
                }
            }
            EntryKind::RegularFile => {
                let target = self.target_for(entry.path())?;
                if let Some(parent) = target.parent().filter(|parent| !parent.exists()) {
                    create_dirs(parent)?;
                }
                write_file(&target, entry.mode(), contents)?;
                self.files_written += 1;
            }
            EntryKind::Other => {
                debug!("skipping special entry {}", entry.path().display());
            }
        }
        Ok(())
    }
}

/// Extract the archive at `archive_path` into `destination`.
///
/// Stops at the first entry that cannot be written.
///
/// # Errors
///
/// Returns [`WalkError::Handler`] wrapping [`EntryError::PathTraversal`]
/// for an entry escaping `destination`, or [`EntryError::Io`] for a
/// failed write; [`WalkError::Open`] and [`WalkError::Structural`] for
/// an unreadable archive.
pub fn extract_file(archive_path: &Path, destination: &Path) -> Result<WalkReport, WalkError> {
    let mut extractor = Extractor::new(destination);
    let report = walk_file(archive_path, &mut extractor, ErrorPolicy::StopOnError)?;
    debug!(
        "extracted {} files from {} into {}",
        extractor.files_written(),
        archive_path.display(),
        destination.display()
    );
    Ok(report)
}

/// Validate that a tar entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), EntryError> {
    let escapes = path.is_absolute()
        || path.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        return Err(EntryError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

fn create_dirs(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DEFAULT_DIR_MODE);
    }
    builder.create(path)
}

/// Create or truncate `target`, copy `contents` in, and apply `mode`.
///
/// The handle is closed on every return path when `file` drops.
fn write_file(target: &Path, mode: u32, contents: &mut dyn Read) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode & PERMISSION_MASK);
    }
    let mut file = options.open(target)?;
    io::copy(contents, &mut file)?;
    apply_mode(&file, mode)
}

#[cfg(unix)]
fn apply_mode(file: &fs::File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(mode & PERMISSION_MASK))
}

#[cfg(not(unix))]
fn apply_mode(_file: &fs::File, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "extraction_tests.rs"]
mod tests;
