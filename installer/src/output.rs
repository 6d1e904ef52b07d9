//! Output formatting for the installer CLI.
//!
//! Progress and summary lines are written to an explicit stderr sink so
//! that callers (and tests) decide where they end up.

use crate::archive::ArchiveStats;
use crate::catalog::Version;
use camino::Utf8Path;
use std::fmt::Display;
use std::io::Write;

/// Write `message` and a newline to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

fn plural(count: u64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Summarise the structure of a downloaded archive.
///
/// # Example
///
/// ```
/// use goinstall::archive::ArchiveStats;
/// use goinstall::output::stats_summary;
///
/// let summary = stats_summary(&ArchiveStats::default());
/// assert_eq!(summary, "Archive holds 0 directories, 0 files, 0 bytes");
/// ```
#[must_use]
pub fn stats_summary(stats: &ArchiveStats) -> String {
    format!(
        "Archive holds {}, {}, {}",
        plural(stats.dir_count(), "directory", "directories"),
        plural(stats.file_count(), "file", "files"),
        plural(stats.total_file_bytes(), "byte", "bytes"),
    )
}

/// Format the closing message once a release is in place.
///
/// `destination` is `None` when unpacking was skipped.
#[must_use]
pub fn success_message(
    version: &Version,
    archive_path: &Utf8Path,
    destination: Option<&Utf8Path>,
) -> String {
    match destination {
        Some(destination) => format!("Installed {version} into {destination}"),
        None => format!("Downloaded {version} to {archive_path} (not unpacked)"),
    }
}
