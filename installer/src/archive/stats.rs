//! Structural statistics for an archive.

use super::entry::{ArchiveEntry, EntryKind};
use super::error::{EntryError, WalkError};
use super::walker::{EntryHandler, ErrorPolicy, walk, walk_file};
use std::io::Read;
use std::path::Path;

/// Counts of directories and regular files, plus the declared file bytes.
///
/// Sizes come from entry headers; contents are never read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    file_count: u64,
    dir_count: u64,
    total_file_bytes: u64,
}

impl ArchiveStats {
    /// Walk `source` and collect its statistics.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::Structural`] if the stream is corrupt.
    pub fn collect<R: Read>(source: R) -> Result<Self, WalkError> {
        let mut stats = Self::default();
        walk(source, &mut stats, ErrorPolicy::StopOnError)?;
        Ok(stats)
    }

    /// Open the archive at `path` and collect its statistics.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::Open`] if the file cannot be opened, or
    /// [`WalkError::Structural`] if it is corrupt.
    pub fn from_path(path: &Path) -> Result<Self, WalkError> {
        let mut stats = Self::default();
        walk_file(path, &mut stats, ErrorPolicy::StopOnError)?;
        Ok(stats)
    }

    /// Return the number of regular files.
    #[must_use]
    pub const fn file_count(&self) -> u64 {
        self.file_count
    }

    /// Return the number of directories.
    #[must_use]
    pub const fn dir_count(&self) -> u64 {
        self.dir_count
    }

    /// Return the summed declared size of all regular files.
    #[must_use]
    pub const fn total_file_bytes(&self) -> u64 {
        self.total_file_bytes
    }
}

impl EntryHandler for ArchiveStats {
    fn handle(&mut self, entry: &ArchiveEntry, _contents: &mut dyn Read) -> Result<(), EntryError> {
        match entry.kind() {
            EntryKind::Directory => self.dir_count += 1,
            EntryKind::RegularFile => {
                self.file_count += 1;
                self.total_file_bytes += entry.size();
            }
            EntryKind::Other => {}
        }
        Ok(())
    }
}
