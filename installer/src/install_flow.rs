//! End-to-end install orchestration.
//!
//! The pipeline is: fetch the catalog, pick the newest stable release,
//! locate the archive for the requested platform, download and verify it
//! into the work directory, report its structure, and unpack it into the
//! destination unless unpacking is disabled.

use crate::archive::{ArchiveStats, extract_file};
use crate::artefact::{DownloadOutcome, DownloadRequest, IntegrityDownloader};
use crate::catalog::{Version, fetch_catalog, find_file, latest_stable};
use crate::cli::Cli;
use crate::error::{InstallerError, Result};
use crate::output::{stats_summary, success_message, write_stderr_line};
use crate::transport::{HttpTransport, UreqTransport};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::fs;
use std::io::Write;
use tempfile::TempDir;

/// Prefix for work directories created when none is requested.
pub const WORK_DIR_PREFIX: &str = "goinstall";

/// Resolved settings for one install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// Directory to unpack into; required unless `no_unpack` is set.
    pub destination: Option<Utf8PathBuf>,
    /// Directory holding the archive; a fresh temp dir when `None`.
    pub work_dir: Option<Utf8PathBuf>,
    /// Target operating system in Go naming.
    pub os: String,
    /// Target architecture in Go naming.
    pub arch: String,
    /// Remove a work directory created by this run once finished.
    pub clean_after: bool,
    /// Stop after download and verification.
    pub no_unpack: bool,
    /// Release catalog endpoint.
    pub catalog_url: String,
    /// Base URL that archive filenames are appended to.
    pub download_base: String,
    /// Suppress progress output.
    pub quiet: bool,
}

impl InstallConfig {
    /// Build a configuration from parsed arguments, resolving relative
    /// directories against `cwd`.
    #[must_use]
    pub fn from_cli(cli: &Cli, cwd: &Utf8Path) -> Self {
        Self {
            destination: cli.destination.as_deref().map(|path| absolutize(path, cwd)),
            work_dir: cli.work_dir.as_deref().map(|path| absolutize(path, cwd)),
            os: cli.os.clone(),
            arch: cli.arch.clone(),
            clean_after: cli.clean_after,
            no_unpack: cli.no_unpack,
            catalog_url: cli.catalog_url.clone(),
            download_base: cli.download_base.clone(),
            quiet: cli.quiet,
        }
    }

    /// Return the directory to unpack into, or `None` when unpacking is
    /// disabled.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::MissingDestination`] when unpacking is
    /// enabled but no destination was given.
    pub fn unpack_destination(&self) -> Result<Option<&Utf8Path>> {
        if self.no_unpack {
            return Ok(None);
        }
        self.destination
            .as_deref()
            .map(Some)
            .ok_or(InstallerError::MissingDestination)
    }
}

/// What an install run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// The release that was installed.
    pub version: Version,
    /// Where the archive was stored. Already removed when the run cleaned
    /// up its own temporary work directory.
    pub archive_path: Utf8PathBuf,
    /// Whether the archive was fetched or reused.
    pub outcome: DownloadOutcome,
    /// Structure of the archive.
    pub stats: ArchiveStats,
    /// Directory the archive was unpacked into, if it was unpacked.
    pub extracted_to: Option<Utf8PathBuf>,
}

/// Run an install against the public Go download site.
///
/// # Errors
///
/// See [`run_install_with`].
pub fn run_install(config: &InstallConfig, stderr: &mut dyn Write) -> Result<InstallReport> {
    run_install_with(config, &UreqTransport, stderr)
}

/// Run an install, issuing every request through `transport`.
///
/// # Errors
///
/// Returns [`InstallerError::MissingDestination`] before any request when
/// no destination is configured for unpacking,
/// [`InstallerError::ArtifactNotFound`] when the newest stable release has
/// no archive for the platform, and wraps catalog, download, and archive
/// failures otherwise.
pub fn run_install_with(
    config: &InstallConfig,
    transport: &dyn HttpTransport,
    stderr: &mut dyn Write,
) -> Result<InstallReport> {
    let destination = config.unpack_destination()?.map(Utf8Path::to_path_buf);
    let work_dir = WorkDir::resolve(config.work_dir.as_deref(), config.clean_after)?;
    info!(
        "startup: work_dir={} destination={} os={} arch={} clean_after={} no_unpack={}",
        work_dir.path(),
        destination.as_deref().map_or("-", Utf8Path::as_str),
        config.os,
        config.arch,
        config.clean_after,
        config.no_unpack
    );

    progress(config, stderr, format!("Fetching release catalog from {}...", config.catalog_url));
    let releases = fetch_catalog(transport, &config.catalog_url)?;
    let version = latest_stable(&releases)?;
    info!("latest stable release is {version}");

    let tag = version.to_string();
    let file = find_file(&config.os, &config.arch, &tag, &releases).ok_or_else(|| {
        InstallerError::ArtifactNotFound {
            os: config.os.clone(),
            arch: config.arch.clone(),
            version: tag.clone(),
        }
    })?;
    let filename = plain_file_name(&file.filename)?;
    let url = artifact_url(&config.download_base, filename);
    let archive_path = work_dir.path().join(filename);

    progress(config, stderr, format!("Downloading {url}..."));
    let outcome = IntegrityDownloader::new(transport).download(&DownloadRequest {
        url: &url,
        dest: archive_path.as_std_path(),
        sha256: &file.sha256,
        size: file.size,
    })?;
    if outcome == DownloadOutcome::AlreadyPresent {
        progress(config, stderr, format!("Reusing verified archive {archive_path}"));
    }

    let stats = ArchiveStats::from_path(archive_path.as_std_path())?;
    info!(
        "{archive_path}: {} directories, {} files, {} bytes",
        stats.dir_count(),
        stats.file_count(),
        stats.total_file_bytes()
    );
    progress(config, stderr, stats_summary(&stats));

    if let Some(destination) = &destination {
        progress(config, stderr, format!("Unpacking into {destination}..."));
        fs::create_dir_all(destination)?;
        let walk = extract_file(archive_path.as_std_path(), destination.as_std_path())?;
        debug!("unpacked {} entries into {destination}", walk.entries());
    }

    progress(
        config,
        stderr,
        success_message(&version, &archive_path, destination.as_deref()),
    );
    work_dir.finish()?;

    Ok(InstallReport {
        version,
        archive_path,
        outcome,
        stats,
        extracted_to: destination,
    })
}

fn progress(config: &InstallConfig, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !config.quiet {
        write_stderr_line(stderr, message);
    }
}

/// Join an archive filename onto the download base URL.
///
/// # Examples
///
/// ```
/// use goinstall::install_flow::artifact_url;
///
/// assert_eq!(
///     artifact_url("https://go.dev/dl", "go1.21.4.linux-amd64.tar.gz"),
///     "https://go.dev/dl/go1.21.4.linux-amd64.tar.gz"
/// );
/// ```
#[must_use]
pub fn artifact_url(base: &str, filename: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{filename}")
    } else {
        format!("{base}/{filename}")
    }
}

/// Resolve `path` against `cwd` when it is relative.
#[must_use]
pub fn absolutize(path: &Utf8Path, cwd: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Reject catalog filenames that would place the archive outside the work
/// directory.
fn plain_file_name(filename: &str) -> Result<&str> {
    match Utf8Path::new(filename).file_name() {
        Some(name) if name == filename => Ok(name),
        _ => Err(InstallerError::InvalidPath {
            reason: format!("catalog filename {filename:?} is not a plain file name"),
        }),
    }
}

/// The directory archives are downloaded into.
///
/// A directory created by this run is removed on [`WorkDir::finish`] (or
/// on drop after an error) when cleanup was requested, and left in place
/// otherwise. A requested directory is never removed.
struct WorkDir {
    path: Utf8PathBuf,
    temp: Option<TempDir>,
}

impl WorkDir {
    fn resolve(requested: Option<&Utf8Path>, clean_after: bool) -> Result<Self> {
        if let Some(path) = requested {
            fs::create_dir_all(path)?;
            return Ok(Self {
                path: path.to_path_buf(),
                temp: None,
            });
        }

        let temp = tempfile::Builder::new()
            .prefix(WORK_DIR_PREFIX)
            .tempdir()?;
        let path = utf8_path(temp.path())?;
        debug!("created work directory {path}");
        if clean_after {
            Ok(Self {
                path,
                temp: Some(temp),
            })
        } else {
            let _kept = temp.keep();
            Ok(Self { path, temp: None })
        }
    }

    fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn finish(self) -> Result<()> {
        if let Some(temp) = self.temp {
            debug!("removing work directory {}", self.path);
            temp.close()?;
        }
        Ok(())
    }
}

fn utf8_path(path: &std::path::Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).map_err(|path| InstallerError::InvalidPath {
        reason: format!("{} is not valid UTF-8", path.display()),
    })
}

#[cfg(test)]
#[path = "install_flow_tests.rs"]
mod tests;
