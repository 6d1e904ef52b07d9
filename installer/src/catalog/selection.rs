//! Latest-stable selection and artefact lookup over a decoded catalog.

use super::error::CatalogError;
use super::release::{Release, ReleaseFile};
use super::version::{Version, parse_version};
use log::{debug, warn};

/// Return the highest version among releases flagged as stable.
///
/// Malformed stable tags take part as [`Version::ZERO`], so they can only
/// win when nothing else is stable.
///
/// # Errors
///
/// Returns [`CatalogError::EmptyCatalog`] when no release is stable.
///
/// # Examples
///
/// ```
/// use goinstall::catalog::{Release, Version, latest_stable};
///
/// let releases = vec![
///     Release { version: "go1.21.4".to_owned(), stable: true, files: vec![] },
///     Release { version: "go1.22rc1".to_owned(), stable: false, files: vec![] },
///     Release { version: "go1.20.11".to_owned(), stable: true, files: vec![] },
/// ];
/// assert_eq!(latest_stable(&releases).expect("stable release"), Version::new(1, 21, 4));
/// ```
pub fn latest_stable(releases: &[Release]) -> Result<Version, CatalogError> {
    let latest = releases
        .iter()
        .filter(|release| release.stable)
        .map(|release| parse_version(&release.version))
        .max()
        .ok_or(CatalogError::EmptyCatalog)?;
    debug!("latest stable version is {latest}");
    Ok(latest)
}

/// Locate the file for `os`/`arch` within the release tagged `version`.
///
/// Only the first release whose tag equals `version` is searched. Within
/// it, the first file whose own tag, OS, and architecture all match
/// exactly is returned. `None` means no match; the caller decides whether
/// that is fatal.
#[must_use]
pub fn find_file<'a>(
    os: &str,
    arch: &str,
    version: &str,
    releases: &'a [Release],
) -> Option<&'a ReleaseFile> {
    let found = releases
        .iter()
        .find(|release| release.version == version)
        .and_then(|release| {
            release
                .files
                .iter()
                .find(|file| file.version == version && file.os == os && file.arch == arch)
        });
    if found.is_none() {
        warn!("no file found for os={os} arch={arch} version={version}");
    }
    found
}
