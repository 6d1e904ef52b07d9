//! Error types for catalog retrieval and version parsing.

use crate::transport::TransportError;
use thiserror::Error;

/// Errors arising from catalog retrieval or selection.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No release in the catalog is flagged as stable.
    #[error("catalog contains no stable release")]
    EmptyCatalog,

    /// The catalog endpoint answered with an unexpected status or media type.
    #[error("unexpected catalog response from {url}: status {status}, content type \"{content_type}\"")]
    UnexpectedResponse {
        /// The catalog URL.
        url: String,
        /// The HTTP status code received.
        status: u16,
        /// The `Content-Type` header received, empty when absent.
        content_type: String,
    },

    /// The catalog body was not a valid release list.
    #[error("failed to decode catalog: {0}")]
    Decode(#[from] serde_json::Error),

    /// The catalog request could not be completed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Reasons a release tag is not a well-formed version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    /// The tag lacks the `go` prefix.
    #[error("version tag \"{tag}\" does not start with \"go\"")]
    MissingPrefix {
        /// The rejected tag.
        tag: String,
    },

    /// The tag does not have exactly three dot-separated fields.
    #[error("version tag \"{tag}\" has {found} dot-separated fields; expected 3")]
    FieldCount {
        /// The rejected tag.
        tag: String,
        /// How many fields were found.
        found: usize,
    },

    /// A field is not a non-negative decimal integer.
    #[error("version tag \"{tag}\" has non-numeric field \"{field}\"")]
    NonNumeric {
        /// The rejected tag.
        tag: String,
        /// The offending field.
        field: String,
    },
}
