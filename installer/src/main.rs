//! Go installer CLI entrypoint.
//!
//! This binary downloads the newest stable Go release for the requested
//! platform, verifies it, and unpacks it into the destination directory.

use camino::Utf8PathBuf;
use clap::Parser;
use goinstall::cli::Cli;
use goinstall::error::{InstallerError, Result};
use goinstall::install_flow::{InstallConfig, run_install};
use goinstall::output::write_stderr_line;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Installs the `env_logger` backend; `RUST_LOG` overrides the CLI level.
fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let cwd = current_dir()?;
    let config = InstallConfig::from_cli(cli, &cwd);
    run_install(&config, stderr)?;
    Ok(())
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| InstallerError::InvalidPath {
        reason: format!("current directory is not valid UTF-8: {e}"),
    })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("goinstall: {err}"));
            1
        }
    }
}
