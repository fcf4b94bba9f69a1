//! Completions command handler.

use crate::completion::{generate_completion_script, parse_shell};
use crate::error::Result;

/// Print the completion script for `shell` to stdout.
pub fn completions_command(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    print!("{}", generate_completion_script(shell));
    Ok(())
}
