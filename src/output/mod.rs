//! Plain terminal output for the one-shot commands.
//!
//! - [`banner`] - Verdict banner
//! - [`messages`] - Error, warning, and info messages
//! - [`status`] - View model rendered as text
//! - [`progress`] - Progress bar and fetch spinner

pub mod banner;
pub mod messages;
pub mod progress;
pub mod status;

/// ANSI color codes for terminal output.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
}

pub use colors::*;

pub use banner::pill_banner;
pub use messages::{print_error, print_success, print_warning};
pub use progress::{make_progress_bar, FetchSpinner};
pub use status::{format_view, print_view};

use crate::view::Severity;

/// ANSI color for a pill or badge severity.
pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Ok => GREEN,
        Severity::Bad => RED,
        Severity::Warn => YELLOW,
    }
}
