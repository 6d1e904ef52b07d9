//! Shared test utilities for the installer crate.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! behaviour suites under `tests/`.

use crate::catalog::{ArtifactKind, Release, ReleaseFile};
use crate::transport::{HttpResponse, HttpTransport, TransportError};
use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Cursor, Write};
use tar::{EntryType, Header};

/// Return the lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Return `len` bytes of deterministic, incompressible noise.
#[must_use]
pub fn noise_bytes(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let [byte, ..] = state.to_le_bytes();
            byte
        })
        .collect()
}

/// A canned response served by [`StubTransport`].
#[derive(Debug, Clone)]
pub struct StubResponse {
    /// Status code to report.
    pub status: u16,
    /// `Content-Type` to report.
    pub content_type: Option<String>,
    /// `Content-Length` to report.
    pub content_length: Option<u64>,
    /// Body bytes to stream.
    pub body: Vec<u8>,
}

impl StubResponse {
    /// A 200 response whose declared length matches `body`.
    #[must_use]
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_owned()),
            content_length: Some(body.len() as u64),
            body,
        }
    }

    /// An empty response with the given status.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            content_length: Some(0),
            body: Vec::new(),
        }
    }

    /// Override the declared `Content-Length`.
    #[must_use]
    pub const fn with_content_length(mut self, content_length: Option<u64>) -> Self {
        self.content_length = content_length;
        self
    }
}

/// An [`HttpTransport`] serving canned responses and recording requests.
///
/// Unknown URLs fail with [`TransportError::Request`].
#[derive(Debug, Default)]
pub struct StubTransport {
    routes: HashMap<String, StubResponse>,
    requests: RefCell<Vec<String>>,
}

impl StubTransport {
    /// Create a transport with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `response` for every request to `url`.
    #[must_use]
    pub fn with_route(mut self, url: &str, response: StubResponse) -> Self {
        self.routes.insert(url.to_owned(), response);
        self
    }

    /// Return how many requests were made.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Return the requested URLs in order.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl HttpTransport for StubTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(url.to_owned());
        let response = self
            .routes
            .get(url)
            .ok_or_else(|| TransportError::Request {
                url: url.to_owned(),
                reason: "no stub route".to_owned(),
            })?;
        Ok(HttpResponse {
            status: response.status,
            content_length: response.content_length,
            content_type: response.content_type.clone(),
            body: Box::new(Cursor::new(response.body.clone())),
        })
    }
}

/// Build a catalog entry with a single archive for `os`/`arch`.
#[must_use]
pub fn release_with_archive(
    version: &str,
    stable: bool,
    os: &str,
    arch: &str,
    archive: &[u8],
) -> Release {
    Release {
        version: version.to_owned(),
        stable,
        files: vec![ReleaseFile {
            filename: format!("{version}.{os}-{arch}.tar.gz"),
            os: os.to_owned(),
            arch: arch.to_owned(),
            version: version.to_owned(),
            sha256: sha256_hex(archive),
            size: archive.len() as u64,
            kind: ArtifactKind::Archive,
        }],
    }
}

/// Serialise releases into catalog JSON.
///
/// # Errors
///
/// Returns the serialiser's error unchanged.
pub fn catalog_json(releases: &[Release]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(releases)
}

#[derive(Debug, Clone)]
enum FixtureKind {
    Directory,
    File(Vec<u8>),
    Symlink(String),
}

#[derive(Debug, Clone)]
struct FixtureEntry {
    name: String,
    mode: u32,
    kind: FixtureKind,
}

/// Builds in-memory tar archives, including entries with hostile names.
///
/// Names are written into the header verbatim, so `../` segments and
/// absolute paths survive into the archive. Names and link targets longer
/// than the 100-byte header fields are truncated.
#[derive(Debug, Clone, Default)]
pub struct TarFixture {
    entries: Vec<FixtureEntry>,
}

impl TarFixture {
    /// Create an empty fixture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directory entry.
    #[must_use]
    pub fn dir(mut self, name: &str) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_owned(),
            mode: 0o755,
            kind: FixtureKind::Directory,
        });
        self
    }

    /// Append a regular file entry.
    #[must_use]
    pub fn file(mut self, name: &str, contents: &[u8], mode: u32) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_owned(),
            mode,
            kind: FixtureKind::File(contents.to_vec()),
        });
        self
    }

    /// Append a symbolic link entry.
    #[must_use]
    pub fn symlink(mut self, name: &str, target: &str) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_owned(),
            mode: 0o777,
            kind: FixtureKind::Symlink(target.to_owned()),
        });
        self
    }

    /// Encode the entries as an uncompressed tar stream.
    #[must_use]
    pub fn to_tar(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            append_raw(&mut out, entry);
        }
        out.resize(out.len() + 2 * BLOCK_SIZE, 0);
        out
    }

    /// Encode the entries as a gzip-compressed tar stream.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the gzip encoder.
    pub fn to_tar_gz(&self) -> io::Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.to_tar())?;
        encoder.finish()
    }
}

/// Tar headers and payloads are framed in blocks of this size.
const BLOCK_SIZE: usize = 512;

fn append_raw(out: &mut Vec<u8>, entry: &FixtureEntry) {
    let mut header = Header::new_gnu();
    copy_field(&mut header.as_old_mut().name, entry.name.as_bytes());
    header.set_mode(entry.mode);
    header.set_mtime(0);

    let data: &[u8] = match &entry.kind {
        FixtureKind::Directory => {
            header.set_entry_type(EntryType::Directory);
            &[]
        }
        FixtureKind::File(contents) => {
            header.set_entry_type(EntryType::Regular);
            contents
        }
        FixtureKind::Symlink(target) => {
            header.set_entry_type(EntryType::Symlink);
            copy_field(&mut header.as_old_mut().linkname, target.as_bytes());
            &[]
        }
    };
    header.set_size(data.len() as u64);
    header.set_cksum();

    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(data);
    let padding = (BLOCK_SIZE - data.len() % BLOCK_SIZE) % BLOCK_SIZE;
    out.resize(out.len() + padding, 0);
}

fn copy_field(field: &mut [u8], value: &[u8]) {
    for (slot, byte) in field.iter_mut().zip(value) {
        *slot = *byte;
    }
}
