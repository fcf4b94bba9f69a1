//! Basic message output functions.

use super::colors::*;

/// Print an error message to stderr.
pub fn print_error(msg: &str) {
    eprintln!("{RED}{BOLD}Error:{RESET} {}", msg);
}

/// Print a warning message to stderr.
pub fn print_warning(msg: &str) {
    eprintln!("{YELLOW}Warning:{RESET} {}", msg);
}

/// Print a confirmation after a successful change.
pub fn print_success(msg: &str) {
    println!("{GREEN}\u{2714}{RESET} {}", msg);
}
