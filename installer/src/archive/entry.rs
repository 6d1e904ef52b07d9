//! Metadata for a single archive entry.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tar::EntryType;

/// The entry kinds handlers distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A directory.
    Directory,
    /// A regular file with content.
    RegularFile,
    /// Links, devices, FIFOs, and anything else.
    Other,
}

impl From<EntryType> for EntryKind {
    fn from(entry_type: EntryType) -> Self {
        if entry_type.is_dir() {
            Self::Directory
        } else if matches!(entry_type, EntryType::Regular | EntryType::Continuous) {
            Self::RegularFile
        } else {
            Self::Other
        }
    }
}

/// Header metadata for one entry, as declared by the archive.
///
/// The entry's content is handed to handlers separately as a reader that
/// is only valid for the duration of the handler call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    kind: EntryKind,
    path: PathBuf,
    size: u64,
    mode: u32,
}

impl ArchiveEntry {
    /// Construct an entry view.
    #[must_use]
    pub fn new(kind: EntryKind, path: impl Into<PathBuf>, size: u64, mode: u32) -> Self {
        Self {
            kind,
            path: path.into(),
            size,
            mode,
        }
    }

    /// Read the metadata of a decoded tar entry.
    pub(crate) fn from_tar<R: Read>(entry: &tar::Entry<'_, R>) -> io::Result<Self> {
        let header = entry.header();
        Ok(Self {
            kind: EntryKind::from(header.entry_type()),
            path: entry.path()?.into_owned(),
            size: entry.size(),
            mode: header.mode()?,
        })
    }

    /// Return the entry kind.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Return the entry name relative to the archive root.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the declared content size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Return the declared permission bits.
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::directory(EntryType::Directory, EntryKind::Directory)]
    #[case::regular(EntryType::Regular, EntryKind::RegularFile)]
    #[case::contiguous(EntryType::Continuous, EntryKind::RegularFile)]
    #[case::symlink(EntryType::Symlink, EntryKind::Other)]
    #[case::hard_link(EntryType::Link, EntryKind::Other)]
    #[case::fifo(EntryType::Fifo, EntryKind::Other)]
    fn classifies_entry_types(#[case] entry_type: EntryType, #[case] expected: EntryKind) {
        assert_eq!(EntryKind::from(entry_type), expected);
    }
}
