//! Command-line definition.
//!
//! Lives in the library so completion scripts can be generated from the same
//! definition the binary parses.

use crate::filter::FilterTab;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "harness-dash")]
#[command(
    version,
    about = "Live terminal dashboard for test harness results",
    after_help = "EXAMPLES:
    # Watch the default endpoint (http://127.0.0.1:3000/result)
    harness-dash

    # Watch a result file written by the harness
    harness-dash watch --file .harness/result.json

    # Print the latest result once, failed tests only
    harness-dash status --filter failed

    # Poll every second by default
    harness-dash config set interval_ms 1000"
)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where to read results from. Defaults to the configured URL.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceArgs {
    /// Result endpoint URL (overrides config)
    #[arg(long, conflicts_with = "file")]
    pub url: Option<String>,

    /// Read a result JSON file instead of polling a URL
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the live dashboard (default)
    #[command(after_help = "KEYS:
    r            Refresh now
    a            Toggle auto-refresh
    i            Cycle polling interval (1s, 3s, 5s, 10s)
    Tab, 1-3     Switch between All / Passed / Failed
    /            Search (Enter keeps, Esc clears)
    Up/Down      Scroll tests
    PgUp/PgDn    Scroll output
    q, Esc       Quit")]
    Watch {
        #[command(flatten)]
        source: SourceArgs,

        /// Polling interval in milliseconds (overrides config)
        #[arg(long, value_name = "MS")]
        interval: Option<u64>,

        /// Start with auto-refresh turned off
        #[arg(long)]
        no_auto_refresh: bool,
    },

    /// Fetch the result once and print it
    #[command(after_help = "EXIT STATUS:
    0  The result was fetched and the challenge has not failed
    1  The fetch failed, or the challenge failed")]
    Status {
        #[command(flatten)]
        source: SourceArgs,

        /// Print the normalized result as JSON
        #[arg(long)]
        json: bool,

        /// Only list tests with this status
        #[arg(long, default_value_t = FilterTab::All, value_name = "all|passed|failed")]
        filter: FilterTab,

        /// Only list tests whose name or hint contains this text
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Show or edit the configuration
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },

    /// Print a shell completion script
    #[command(hide = true)]
    Completions {
        /// bash, zsh or fish
        shell: String,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigSubcommand {
    /// Set a configuration value
    Set { key: String, value: String },

    /// Restore the default configuration
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_opens_dashboard() {
        let cli = Cli::try_parse_from(["harness-dash"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_watch_flags() {
        let cli = Cli::try_parse_from([
            "harness-dash",
            "watch",
            "--url",
            "http://localhost:9000/result",
            "--interval",
            "1000",
            "--no-auto-refresh",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Watch {
                source,
                interval,
                no_auto_refresh,
            }) => {
                assert_eq!(source.url.as_deref(), Some("http://localhost:9000/result"));
                assert_eq!(interval, Some(1000));
                assert!(no_auto_refresh);
            }
            other => panic!("expected watch, got {:?}", other),
        }
    }

    #[test]
    fn test_url_and_file_conflict() {
        let result = Cli::try_parse_from([
            "harness-dash",
            "watch",
            "--url",
            "http://x/result",
            "--file",
            "result.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_flags() {
        let cli = Cli::try_parse_from([
            "harness-dash",
            "status",
            "--file",
            "result.json",
            "--json",
            "--filter",
            "failed",
            "--search",
            "timeout",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Status {
                source,
                json,
                filter,
                search,
            }) => {
                assert_eq!(source.file, Some(PathBuf::from("result.json")));
                assert!(json);
                assert_eq!(filter, FilterTab::Failed);
                assert_eq!(search, "timeout");
            }
            other => panic!("expected status, got {:?}", other),
        }
    }

    #[test]
    fn test_status_defaults() {
        let cli = Cli::try_parse_from(["harness-dash", "status"]).unwrap();
        match cli.command {
            Some(Commands::Status {
                source,
                json,
                filter,
                search,
            }) => {
                assert_eq!(source, SourceArgs::default());
                assert!(!json);
                assert_eq!(filter, FilterTab::All);
                assert!(search.is_empty());
            }
            other => panic!("expected status, got {:?}", other),
        }
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["harness-dash", "config"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config { subcommand: None })));

        let cli =
            Cli::try_parse_from(["harness-dash", "config", "set", "interval_ms", "1000"]).unwrap();
        match cli.command {
            Some(Commands::Config {
                subcommand: Some(ConfigSubcommand::Set { key, value }),
            }) => {
                assert_eq!(key, "interval_ms");
                assert_eq!(value, "1000");
            }
            other => panic!("expected config set, got {:?}", other),
        }

        let cli = Cli::try_parse_from(["harness-dash", "config", "reset"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                subcommand: Some(ConfigSubcommand::Reset)
            })
        ));
    }

    #[test]
    fn test_completions_is_parsed() {
        let cli = Cli::try_parse_from(["harness-dash", "completions", "zsh"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Completions { ref shell }) if shell == "zsh"));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
