//! CLI argument definitions for the Go installer.
//!
//! Every option can also be supplied through a `GOINSTALL*` environment
//! variable; explicit flags win over the environment.

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::platform::{host_arch, host_os};
use camino::Utf8PathBuf;
use clap::Parser;
use log::LevelFilter;

/// Base URL that release archives are downloaded from.
pub const DEFAULT_DOWNLOAD_BASE: &str = "https://go.dev/dl/";

/// Download and install the latest stable Go release.
#[derive(Parser, Debug, Clone)]
#[command(name = "goinstall")]
#[command(version, about)]
#[command(long_about = concat!(
    "Download and install the latest stable Go release.\n\n",
    "The release catalog is fetched from go.dev, the newest stable release is ",
    "selected, and the archive for the requested platform is downloaded and ",
    "verified against the published SHA-256 digest. The archive is then unpacked ",
    "into the destination directory unless --nounpack is given.\n\n",
    "An archive already present in the work directory with the expected digest ",
    "is reused without touching the network.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install into /usr/local (creates /usr/local/go):\n",
    "    $ goinstall -d /usr/local\n\n",
    "  Fetch the macOS arm64 archive without unpacking it:\n",
    "    $ goinstall -n -o darwin -a arm64 -w ./downloads\n\n",
    "  Configure through the environment:\n",
    "    $ GOINSTALLDSTPATH=$HOME/sdk goinstall --cleanafter",
))]
pub struct Cli {
    /// Directory to unpack the release into.
    #[arg(short = 'd', long = "ddir", env = "GOINSTALLDSTPATH", value_name = "DIR")]
    pub destination: Option<Utf8PathBuf>,

    /// Directory to store the downloaded archive [default: a fresh temp dir].
    #[arg(short = 'w', long = "wdir", env = "GOINSTALLTMPPATH", value_name = "DIR")]
    pub work_dir: Option<Utf8PathBuf>,

    /// Operating system of the archive, in Go naming.
    #[arg(short, long, env = "GOINSTALLOS", default_value_t = host_os())]
    pub os: String,

    /// Architecture of the archive, in Go naming.
    #[arg(short, long, env = "GOINSTALLARCH", default_value_t = host_arch())]
    pub arch: String,

    /// Remove the temporary work directory once finished.
    #[arg(short = 'c', long = "cleanafter", env = "GOINSTALLCLEANAFTER")]
    pub clean_after: bool,

    /// Download and verify only; do not unpack.
    #[arg(short = 'n', long = "nounpack", env = "GOINSTALLNOUNPACK")]
    pub no_unpack: bool,

    /// Release catalog endpoint.
    #[arg(long, env = "GOINSTALLCATALOGURL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Base URL that archive filenames are appended to.
    #[arg(long, env = "GOINSTALLDOWNLOADBASE", default_value = DEFAULT_DOWNLOAD_BASE)]
    pub download_base: String,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Return the log level implied by `--quiet` and `--verbose`.
    ///
    /// `RUST_LOG` still overrides this when the logger is built.
    ///
    /// # Examples
    ///
    /// ```
    /// use goinstall::cli::Cli;
    /// use log::LevelFilter;
    ///
    /// let cli = Cli { verbosity: 1, ..Cli::default() };
    /// assert_eq!(cli.log_level(), LevelFilter::Debug);
    /// ```
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl Default for Cli {
    /// Creates a `Cli` targeting the host platform with no directories set.
    ///
    /// Useful for programmatic construction where only specific fields
    /// need to be set.
    ///
    /// # Examples
    ///
    /// ```
    /// use goinstall::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert!(cli.destination.is_none());
    /// assert!(!cli.no_unpack);
    /// ```
    fn default() -> Self {
        Self {
            destination: None,
            work_dir: None,
            os: host_os(),
            arch: host_arch(),
            clean_after: false,
            no_unpack: false,
            catalog_url: DEFAULT_CATALOG_URL.to_owned(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_owned(),
            verbosity: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
