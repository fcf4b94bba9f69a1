//! Watch command handler.
//!
//! Opens the live TUI dashboard.

use crate::cli::SourceArgs;
use crate::config::{load_config, validate_config, Config};
use crate::error::Result;
use crate::logging::{default_log_file, init_logging, LogTarget};
use crate::output::print_warning;
use crate::tui::run_dashboard;

use super::resolve_source;

/// Flags accepted by `harness-dash watch`.
#[derive(Debug, Clone, Default)]
pub struct WatchOptions {
    pub source: SourceArgs,
    pub interval: Option<u64>,
    pub no_auto_refresh: bool,
    pub verbose: bool,
}

impl WatchOptions {
    /// Layer the command-line flags over the loaded configuration.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(url) = &self.source.url {
            config.url = url.clone();
        }
        if let Some(ms) = self.interval {
            config.interval_ms = ms;
        }
        if self.no_auto_refresh {
            config.auto_refresh = false;
        }
        config
    }
}

/// Launch the dashboard and block until the user quits.
pub fn watch_command(options: WatchOptions) -> Result<()> {
    let config = options.apply_to(load_config()?);
    validate_config(&config)?;

    // The alternate screen owns the terminal, so logs go to a file.
    match default_log_file().and_then(|path| init_logging(options.verbose, LogTarget::File(path)))
    {
        Ok(()) => {}
        Err(e) => print_warning(&format!("Logging disabled: {}", e)),
    }

    let source = resolve_source(&options.source, &config);
    run_dashboard(&config, source)
}
