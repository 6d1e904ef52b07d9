//! Catalog retrieval.
//!
//! The catalog is a JSON array of [`Release`] objects. A response is only
//! accepted with status 200 and a JSON media type; anything else is
//! reported as [`CatalogError::UnexpectedResponse`].

use super::error::CatalogError;
use super::release::Release;
use crate::transport::HttpTransport;
use log::info;

/// The catalog endpoint for official releases.
pub const DEFAULT_CATALOG_URL: &str = "https://go.dev/dl/?mode=json";

/// The media type the catalog must be served with.
const JSON_MEDIA_TYPE: &str = "application/json";

/// Fetch and decode the release catalog at `url`.
///
/// # Errors
///
/// Returns [`CatalogError::Transport`] when the request fails,
/// [`CatalogError::UnexpectedResponse`] for a non-200 status or non-JSON
/// content type, and [`CatalogError::Decode`] for a malformed body.
pub fn fetch_catalog(
    transport: &dyn HttpTransport,
    url: &str,
) -> Result<Vec<Release>, CatalogError> {
    info!("retrieving download information from {url}");
    let response = transport.get(url)?;
    if response.status != 200 || !is_json_media_type(response.content_type.as_deref()) {
        return Err(CatalogError::UnexpectedResponse {
            url: url.to_owned(),
            status: response.status,
            content_type: response.content_type.unwrap_or_default(),
        });
    }
    let releases: Vec<Release> = serde_json::from_reader(response.body)?;
    info!("catalog lists {} releases", releases.len());
    Ok(releases)
}

/// Decode a catalog from an in-memory JSON document.
///
/// # Errors
///
/// Returns [`CatalogError::Decode`] if the JSON is malformed or does not
/// match the release schema.
///
/// # Examples
///
/// ```
/// use goinstall::catalog::parse_catalog;
///
/// let releases = parse_catalog(r#"[{"version":"go1.21.4","stable":true,"files":[]}]"#)
///     .expect("valid catalog");
/// assert_eq!(releases.len(), 1);
/// ```
pub fn parse_catalog(json: &str) -> Result<Vec<Release>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

/// Compare the media type, ignoring parameters such as `charset`.
fn is_json_media_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|value| value.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE))
}
