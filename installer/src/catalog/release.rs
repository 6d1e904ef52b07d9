//! Wire types for the release catalog.
//!
//! The catalog endpoint serves lowercase keys (`version`, `stable`,
//! `files`, ...). The capitalised spellings are accepted as aliases so
//! that catalogs mirrored through other tooling still decode.

use super::error::VersionParseError;
use super::version::Version;
use serde::{Deserialize, Serialize};

/// One published release and its downloadable files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub struct Release {
    /// Release tag, e.g. `go1.21.4`.
    #[serde(alias = "Version")]
    pub version: String,
    /// Whether the release is production-ready.
    #[serde(alias = "Stable")]
    pub stable: bool,
    /// Files published for this release, in catalog order.
    #[serde(alias = "Files", default)]
    pub files: Vec<ReleaseFile>,
}

impl Release {
    /// Parse this release's tag without degrading failures.
    ///
    /// # Errors
    ///
    /// Returns the [`VersionParseError`] for tags that are not of the
    /// `go<major>.<minor>.<patch>` form.
    pub fn parsed_version(&self) -> Result<Version, VersionParseError> {
        Version::parse(&self.version)
    }
}

/// A single downloadable file within a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub struct ReleaseFile {
    /// File name relative to the download base URL.
    #[serde(alias = "Filename")]
    pub filename: String,
    /// Operating system in Go naming (`linux`, `darwin`, ...).
    #[serde(alias = "OS")]
    pub os: String,
    /// Architecture in Go naming (`amd64`, `arm64`, ...).
    #[serde(alias = "Arch")]
    pub arch: String,
    /// The file's own release tag.
    #[serde(alias = "Version")]
    pub version: String,
    /// Lowercase hex SHA-256 of the file.
    #[serde(alias = "SHA256")]
    pub sha256: String,
    /// File size in bytes.
    #[serde(alias = "Size")]
    pub size: u64,
    /// What sort of file this is.
    #[serde(alias = "Kind", default)]
    pub kind: ArtifactKind,
}

/// The packaging of a release file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// A tar/gzip archive of the toolchain.
    Archive,
    /// A platform installer package.
    Installer,
    /// A source tarball.
    Source,
    /// Any kind this build does not recognise.
    #[default]
    #[serde(other)]
    Other,
}
