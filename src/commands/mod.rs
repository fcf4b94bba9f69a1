//! CLI command handlers for harness-dash.
//!
//! # Commands
//!
//! - [`watch`] - Live TUI dashboard
//! - [`status`] - One-shot fetch and print
//! - [`config`] - Show and edit configuration
//! - [`completions`] - Shell completion scripts

mod completions;
mod config;
mod status;
mod watch;

pub use completions::completions_command;
pub use config::{config_display_command, config_reset_command, config_set_command};
pub use status::{status_command, StatusOptions};
pub use watch::{watch_command, WatchOptions};

use crate::cli::SourceArgs;
use crate::config::Config;
use crate::source::{FileSource, HttpSource, ResultSource};
use std::sync::Arc;

/// Build the result source: `--file` wins, then `--url`, then the configured
/// URL.
pub fn resolve_source(args: &SourceArgs, config: &Config) -> Arc<dyn ResultSource> {
    match (&args.file, &args.url) {
        (Some(path), _) => Arc::new(FileSource::new(path.clone())),
        (None, Some(url)) => Arc::new(HttpSource::new(url.clone())),
        (None, None) => Arc::new(HttpSource::new(config.url.clone())),
    }
}
