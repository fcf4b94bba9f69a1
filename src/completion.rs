//! Shell completion scripts for harness-dash.
//!
//! `harness-dash completions zsh > ~/.zfunc/_harness-dash`

use crate::cli::Cli;
use crate::error::{DashError, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};

const BIN_NAME: &str = "harness-dash";

/// Supported shell types for completion scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl ShellType {
    pub fn to_clap_shell(self) -> Shell {
        match self {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
        }
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parse a shell from a name or a path such as `/usr/bin/zsh`.
pub fn parse_shell(shell: &str) -> Result<ShellType> {
    let name = std::path::Path::new(shell)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(shell);

    match name {
        "bash" => Ok(ShellType::Bash),
        "zsh" => Ok(ShellType::Zsh),
        "fish" => Ok(ShellType::Fish),
        _ => Err(DashError::UnsupportedShell(name.to_string())),
    }
}

/// Generate the completion script for `shell`.
pub fn generate_completion_script(shell: ShellType) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell.to_clap_shell(), &mut cmd, BIN_NAME, &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}
