//! harness-dash CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use clap::Parser;
use harness_dash::cli::{Cli, Commands, ConfigSubcommand, SourceArgs};
use harness_dash::commands::{
    completions_command, config_display_command, config_reset_command, config_set_command,
    status_command, watch_command, StatusOptions, WatchOptions,
};
use harness_dash::output::print_error;

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let result = match cli.command {
        None => watch_command(WatchOptions {
            source: SourceArgs::default(),
            verbose,
            ..WatchOptions::default()
        }),
        Some(Commands::Watch {
            source,
            interval,
            no_auto_refresh,
        }) => watch_command(WatchOptions {
            source,
            interval,
            no_auto_refresh,
            verbose,
        }),
        Some(Commands::Status {
            source,
            json,
            filter,
            search,
        }) => status_command(StatusOptions {
            source,
            json,
            filter,
            search,
            verbose,
        }),
        Some(Commands::Config { subcommand }) => match subcommand {
            None => config_display_command(),
            Some(ConfigSubcommand::Set { key, value }) => config_set_command(&key, &value),
            Some(ConfigSubcommand::Reset) => config_reset_command(),
        },
        Some(Commands::Completions { shell }) => completions_command(&shell),
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
