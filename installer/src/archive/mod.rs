//! Streaming traversal of tar and gzip-compressed tar archives.
//!
//! The [`walker`] drives any [`EntryHandler`] over an archive stream.
//! Two handlers ship with the crate: [`ArchiveStats`] counts entries
//! without reading their contents, and [`Extractor`] materialises
//! directories and regular files beneath a destination root.
//!
//! # Sub-modules
//!
//! - [`entry`] - Per-entry metadata view.
//! - [`error`] - Handler and walk error types.
//! - [`extraction`] - Extraction handler with path traversal protection.
//! - [`stats`] - Counting handler.
//! - [`walker`] - The traversal engine and error policies.

pub mod entry;
pub mod error;
pub mod extraction;
pub mod stats;
pub mod walker;

pub use entry::{ArchiveEntry, EntryKind};
pub use error::{EntryError, WalkError};
pub use extraction::{Extractor, extract_file};
pub use stats::ArchiveStats;
pub use walker::{EntryFailure, EntryHandler, ErrorPolicy, WalkReport, walk, walk_file};
