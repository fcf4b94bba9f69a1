//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so it logs to a file under the config
//! directory. One-shot commands log to stderr. `HARNESS_DASH_LOG` takes an
//! `EnvFilter` directive and overrides the defaults.

use crate::config::ensure_config_dir;
use crate::error::{DashError, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "HARNESS_DASH_LOG";

const LOG_FILENAME: &str = "harness-dash.log";

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Default log file (`~/.config/harness-dash/harness-dash.log`), creating the
/// directory if needed.
pub fn default_log_file() -> Result<PathBuf> {
    Ok(ensure_config_dir()?.join(LOG_FILENAME))
}

/// Level used when `HARNESS_DASH_LOG` is unset.
fn default_directive(verbose: bool, target: &LogTarget) -> &'static str {
    match (verbose, target) {
        (true, _) => "debug",
        (false, LogTarget::File(_)) => "info",
        // Keep one-shot output clean unless something goes wrong.
        (false, LogTarget::Stderr) => "warn",
    }
}

/// Install the global subscriber.
pub fn init_logging(verbose: bool, target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, &target)));

    let installed = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
        }
    };

    installed.map_err(|e| DashError::Config(format!("Failed to initialize logging: {}", e)))
}
