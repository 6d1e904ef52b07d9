//! Throttled progress reporting around a byte stream.
//!
//! [`ProgressReader`] counts bytes as they are read and hands
//! `(transferred, total)` to a callback at most once per interval. The
//! callback is purely observational: its errors are logged and the read
//! carries on.

use log::{info, warn};
use std::io::{self, Read};
use std::time::{Duration, Instant};

/// Minimum time between two progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// Error type progress callbacks may return.
pub type ProgressError = Box<dyn std::error::Error + Send + Sync>;

/// A reader adapter that reports progress through a callback.
///
/// # Examples
///
/// ```
/// use goinstall::artefact::ProgressReader;
/// use std::time::Duration;
///
/// let mut reports = Vec::new();
/// let mut reader = ProgressReader::new(&b"hello"[..], Some(5), |done, total| {
///     reports.push((done, total));
///     Ok(())
/// })
/// .with_interval(Duration::ZERO);
/// let copied = std::io::copy(&mut reader, &mut std::io::sink()).expect("copy");
/// drop(reader);
/// assert_eq!(copied, 5);
/// assert_eq!(reports.last(), Some(&(5, Some(5))));
/// ```
pub struct ProgressReader<R, F> {
    inner: R,
    total: Option<u64>,
    transferred: u64,
    interval: Duration,
    last_report: Instant,
    report: F,
}

impl<R, F> ProgressReader<R, F>
where
    R: Read,
    F: FnMut(u64, Option<u64>) -> Result<(), ProgressError>,
{
    /// Wrap `inner`, reporting against `total` when it is known.
    ///
    /// The first report is due one interval after construction.
    pub fn new(inner: R, total: Option<u64>, report: F) -> Self {
        Self {
            inner,
            total,
            transferred: 0,
            interval: DEFAULT_PROGRESS_INTERVAL,
            last_report: Instant::now(),
            report,
        }
    }

    /// Replace the minimum interval between reports.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Return how many bytes have been read so far.
    pub const fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Return the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn maybe_report(&mut self) {
        if self.last_report.elapsed() < self.interval {
            return;
        }
        self.last_report = Instant::now();
        if let Err(err) = (self.report)(self.transferred, self.total) {
            warn!("progress reporting failed: {err}");
        }
    }
}

impl<R, F> Read for ProgressReader<R, F>
where
    R: Read,
    F: FnMut(u64, Option<u64>) -> Result<(), ProgressError>,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let bytes_read = self.inner.read(buf)?;
        if bytes_read > 0 {
            self.transferred += bytes_read as u64;
            self.maybe_report();
        }
        Ok(bytes_read)
    }
}

/// Build a callback that logs download progress for `url`.
///
/// Reports with an unknown total are skipped.
pub fn log_progress(url: &str) -> impl FnMut(u64, Option<u64>) -> Result<(), ProgressError> {
    let url = url.to_owned();
    move |current, total| {
        let Some(total) = total else {
            return Ok(());
        };
        info!("downloading {url}: {current}/{total} bytes");
        Ok(())
    }
}
