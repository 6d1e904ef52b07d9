//! HTTP transport seam shared by the catalog fetch and the artefact download.
//!
//! Both callers only need a status code, a couple of headers, and a body
//! stream, so the trait keeps to exactly that. Tests substitute a stub or a
//! `mockall` mock and count requests without touching the network.

use std::fmt;
use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

/// Timeout for establishing a connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for receiving the response head once the request is sent.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on streaming a response body; archives run to ~100 MB.
const BODY_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// A received HTTP response with its body still unread.
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The `Content-Length` declared by the server, if any.
    pub content_length: Option<u64>,
    /// The raw `Content-Type` header value, if any.
    pub content_type: Option<String>,
    /// The response body stream.
    pub body: Box<dyn Read + Send>,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Errors raised before any response status is available.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the response head was unreadable.
    #[error("request to {url} failed: {reason}")]
    Request {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },
}

/// Issues blocking HTTP GET requests.
#[cfg_attr(test, mockall::automock)]
pub trait HttpTransport {
    /// Send a GET request for `url` and return the response head and body.
    ///
    /// Non-success status codes are returned as responses, not errors, so
    /// that callers can apply their own status policy.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] when no response was received.
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by a shared `ureq` agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl HttpTransport for UreqTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| TransportError::Request {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;

        let headers = response.headers();
        let content_type = headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let content_length = headers
            .get("content-length")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());

        Ok(HttpResponse {
            status: response.status().as_u16(),
            content_length,
            content_type,
            body: Box::new(response.into_body().into_reader()),
        })
    }
}

/// Shared `ureq` agent that surfaces every status code as a response.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .timeout_recv_response(Some(RESPONSE_TIMEOUT))
            .timeout_recv_body(Some(BODY_TIMEOUT))
            .http_status_as_error(false)
            .build();
        ureq::Agent::new_with_config(config)
    })
}
