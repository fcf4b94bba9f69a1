use crate::error::{DashError, Result};
use crate::scheduler::DEFAULT_INTERVAL_MS;
use crate::view::{RenderOptions, DEFAULT_SKELETON_ROWS, DEFAULT_WAITING_HINT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "harness-dash";

/// Config file name within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Default endpoint served by the test harness.
pub const DEFAULT_URL: &str = "http://127.0.0.1:3000/result";

/// Shortest polling interval accepted from config or flags.
pub const MIN_INTERVAL_MS: u64 = 250;

/// Keys accepted by `config set`.
pub const VALID_KEYS: &[&str] = &[
    "url",
    "interval_ms",
    "auto_refresh",
    "waiting_hint",
    "skeleton_rows",
];

// ============================================================================
// Dashboard Configuration
// ============================================================================

/// User configuration for the dashboard.
///
/// Missing fields in a config file take their default, so a partial file
/// (or an empty one) is valid.
///
/// # Example
///
/// ```toml
/// url = "http://127.0.0.1:3000/result"
/// interval_ms = 3000
/// auto_refresh = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint returning the result document.
    pub url: String,

    /// Polling interval in milliseconds.
    pub interval_ms: u64,

    /// Whether the dashboard polls automatically.
    pub auto_refresh: bool,

    /// Hint shown while no run exists and the harness sent no message.
    pub waiting_hint: String,

    /// Number of skeleton rows shown while a manual refresh is loading.
    pub skeleton_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            interval_ms: DEFAULT_INTERVAL_MS,
            auto_refresh: true,
            waiting_hint: DEFAULT_WAITING_HINT.to_string(),
            skeleton_rows: DEFAULT_SKELETON_ROWS,
        }
    }
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            waiting_hint: self.waiting_hint.clone(),
            skeleton_rows: self.skeleton_rows,
        }
    }
}

// ============================================================================
// Config Validation
// ============================================================================

use std::error::Error;
use std::fmt;

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The result URL is empty.
    EmptyUrl,
    /// The polling interval is below [`MIN_INTERVAL_MS`].
    IntervalTooShort(u64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyUrl => write!(f, "`url` must not be empty"),
            ConfigError::IntervalTooShort(ms) => write!(
                f,
                "`interval_ms` is {}ms; it must be at least {}ms",
                ms, MIN_INTERVAL_MS
            ),
        }
    }
}

impl Error for ConfigError {}

impl From<ConfigError> for DashError {
    fn from(err: ConfigError) -> Self {
        DashError::Config(err.to_string())
    }
}

/// Validate a configuration before the dashboard starts.
pub fn validate_config(config: &Config) -> std::result::Result<(), ConfigError> {
    if config.url.trim().is_empty() {
        return Err(ConfigError::EmptyUrl);
    }
    if config.interval_ms < MIN_INTERVAL_MS {
        return Err(ConfigError::IntervalTooShort(config.interval_ms));
    }
    Ok(())
}

// ============================================================================
// Loading and Saving
// ============================================================================

/// Get the config directory path (~/.config/harness-dash/).
///
/// Does not create the directory.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DashError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME))
}

/// Ensure the config directory exists, returning its path.
pub fn ensure_config_dir() -> Result<PathBuf> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Get the path to the config file.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILENAME))
}

/// Load the configuration from `~/.config/harness-dash/config.toml`.
///
/// If the file doesn't exist, it is created with default values and comments.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        ensure_config_dir()?;
        let config = Config::default();
        fs::write(&path, generate_config_with_comments(&config))?;
        return Ok(config);
    }
    load_config_from(&path)
}

/// Load a configuration from an explicit path. The file must exist.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        DashError::Config(format!(
            "Failed to parse config file at {:?}: {}",
            path, e
        ))
    })
}

/// Save the configuration to `~/.config/harness-dash/config.toml`.
pub fn save_config(config: &Config) -> Result<()> {
    ensure_config_dir()?;
    save_config_to(config, &config_path()?)
}

/// Save the configuration to an explicit path, overwriting it.
pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    fs::write(path, generate_config_with_comments(config))?;
    Ok(())
}

/// Generate config file content with explanatory comments.
fn generate_config_with_comments(config: &Config) -> String {
    format!(
        r#"# harness-dash configuration

# Endpoint serving the test harness result document.
url = {url}

# Polling interval in milliseconds (minimum {min}).
interval_ms = {interval}

# Poll automatically. Toggle at runtime with `a`.
auto_refresh = {auto}

# Hint shown while no run exists and the harness sent no message.
waiting_hint = {hint}

# Skeleton rows shown while a manual refresh is loading.
skeleton_rows = {rows}
"#,
        url = toml_string(&config.url),
        min = MIN_INTERVAL_MS,
        interval = config.interval_ms,
        auto = config.auto_refresh,
        hint = toml_string(&config.waiting_hint),
        rows = config.skeleton_rows,
    )
}

/// Quote a string as a TOML value, escaping whatever TOML requires.
pub fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

// ============================================================================
// Editing
// ============================================================================

/// Apply `key = value` to a config, validating the value.
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| DashError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    match key {
        "url" => {
            if value.trim().is_empty() {
                return Err(invalid("must not be empty"));
            }
            config.url = value.to_string();
        }
        "interval_ms" => {
            let ms: u64 = value
                .parse()
                .map_err(|_| invalid("expected a whole number of milliseconds"))?;
            if ms < MIN_INTERVAL_MS {
                return Err(invalid(&format!("must be at least {}", MIN_INTERVAL_MS)));
            }
            config.interval_ms = ms;
        }
        "auto_refresh" => {
            config.auto_refresh = parse_bool(value).ok_or_else(|| invalid("expected true or false"))?;
        }
        "waiting_hint" => config.waiting_hint = value.to_string(),
        "skeleton_rows" => {
            config.skeleton_rows = value
                .parse()
                .map_err(|_| invalid("expected a non-negative whole number"))?;
        }
        _ => {
            return Err(DashError::Config(format!(
                "Unknown key '{}'. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
