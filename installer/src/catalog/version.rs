//! Release version identifiers.
//!
//! Tags look like `go1.21.4`. [`Version::parse`] reports malformed tags as a
//! [`VersionParseError`] so callers can filter them out, while
//! [`parse_version`] degrades them to [`Version::ZERO`] with a warning. The
//! catalog routinely carries release candidates such as `go1.22rc1`, and
//! those must sort rather than abort selection.

use super::error::VersionParseError;
use log::warn;
use std::fmt;
use std::str::FromStr;

/// Prefix every release tag carries.
pub const VERSION_PREFIX: &str = "go";

/// A `(major, minor, patch)` release version.
///
/// Ordering is lexicographic over the three components, so the zero value
/// used for malformed tags sorts below every real release.
///
/// # Examples
///
/// ```
/// use goinstall::catalog::Version;
///
/// let version: Version = "go1.21.4".parse().expect("well-formed tag");
/// assert_eq!(version, Version::new(1, 21, 4));
/// assert!(version > Version::new(1, 9, 12));
/// assert_eq!(version.to_string(), "go1.21.4");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
}

impl Version {
    /// The sentinel used for tags that could not be parsed.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Construct a version from its components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Return the major component.
    #[must_use]
    pub const fn major(self) -> u64 {
        self.major
    }

    /// Return the minor component.
    #[must_use]
    pub const fn minor(self) -> u64 {
        self.minor
    }

    /// Return the patch component.
    #[must_use]
    pub const fn patch(self) -> u64 {
        self.patch
    }

    /// Return true for the malformed-tag sentinel.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.major == 0 && self.minor == 0 && self.patch == 0
    }

    /// Parse a `go<major>.<minor>.<patch>` tag.
    ///
    /// # Errors
    ///
    /// Returns a [`VersionParseError`] naming the structural defect when
    /// the prefix is missing, the field count is not three, or a field is
    /// not a decimal integer.
    pub fn parse(tag: &str) -> Result<Self, VersionParseError> {
        let Some(numbers) = tag.strip_prefix(VERSION_PREFIX) else {
            return Err(VersionParseError::MissingPrefix {
                tag: tag.to_owned(),
            });
        };

        let fields: Vec<&str> = numbers.split('.').collect();
        let [major, minor, patch] = fields.as_slice() else {
            return Err(VersionParseError::FieldCount {
                tag: tag.to_owned(),
                found: fields.len(),
            });
        };

        Ok(Self::new(
            parse_field(tag, major)?,
            parse_field(tag, minor)?,
            parse_field(tag, patch)?,
        ))
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{VERSION_PREFIX}{}.{}.{}",
            self.major, self.minor, self.patch
        )
    }
}

/// Parse a tag, degrading malformed input to [`Version::ZERO`].
///
/// The defect is logged as a warning and never returned to the caller.
#[must_use]
pub fn parse_version(tag: &str) -> Version {
    match Version::parse(tag) {
        Ok(version) => version,
        Err(err) => {
            warn!("can't parse version: {err}");
            Version::ZERO
        }
    }
}

fn parse_field(tag: &str, field: &str) -> Result<u64, VersionParseError> {
    let non_numeric = || VersionParseError::NonNumeric {
        tag: tag.to_owned(),
        field: field.to_owned(),
    };
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(non_numeric());
    }
    field.parse::<u64>().map_err(|_| non_numeric())
}
