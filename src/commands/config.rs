//! Config command handler.
//!
//! Displays, modifies, and resets the dashboard configuration.

use crate::config::{
    config_path, load_config, save_config, set_config_value, toml_string, validate_config,
    Config,
};
use crate::error::Result;
use crate::output::{print_success, BOLD, CYAN, GRAY, RESET};

/// Display the effective configuration as TOML.
pub fn config_display_command() -> Result<()> {
    let config = load_config()?;
    println!("{BOLD}# harness-dash config{RESET}");
    println!("{GRAY}# {}{RESET}", config_path()?.display());
    println!();
    for (key, value) in config_entries(&config) {
        println!("{CYAN}{}{RESET} = {}", key, value);
    }
    Ok(())
}

/// Set one key and save the file.
pub fn config_set_command(key: &str, value: &str) -> Result<()> {
    let mut config = load_config()?;
    set_config_value(&mut config, key, value)?;
    validate_config(&config)?;
    save_config(&config)?;
    print_success(&format!("Set {} = {}", key, value));
    Ok(())
}

/// Overwrite the file with the defaults.
pub fn config_reset_command() -> Result<()> {
    save_config(&Config::default())?;
    print_success(&format!(
        "Configuration reset to defaults ({})",
        config_path()?.display()
    ));
    Ok(())
}

/// Key/value pairs in file order, values formatted as TOML.
pub fn config_entries(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("url", toml_string(&config.url)),
        ("interval_ms", config.interval_ms.to_string()),
        ("auto_refresh", config.auto_refresh.to_string()),
        ("waiting_hint", toml_string(&config.waiting_hint)),
        ("skeleton_rows", config.skeleton_rows.to_string()),
    ]
}
