//! Release catalog decoding, version ordering, and artefact selection.
//!
//! # Sub-modules
//!
//! - [`error`] - Catalog and version parsing errors.
//! - [`fetch`] - Catalog retrieval over an [`HttpTransport`](crate::transport::HttpTransport).
//! - [`release`] - Wire types for releases and their files.
//! - [`selection`] - Latest-stable selection and artefact lookup.
//! - [`version`] - Release version identifiers and their total order.

pub mod error;
pub mod fetch;
pub mod release;
pub mod selection;
pub mod version;

pub use error::{CatalogError, VersionParseError};
pub use fetch::{DEFAULT_CATALOG_URL, fetch_catalog, parse_catalog};
pub use release::{ArtifactKind, Release, ReleaseFile};
pub use selection::{find_file, latest_stable};
pub use version::{Version, parse_version};
