//! Verdict banner.
//!
//! `━━━ Challenge passed ━━━`, colored by the pill severity and sized to the
//! terminal.

use terminal_size::{terminal_size, Width};

use super::colors::*;
use super::severity_color;
use crate::view::Pill;

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const MIN_BANNER_WIDTH: usize = 20;
const MAX_BANNER_WIDTH: usize = 80;

/// Current terminal width, or 80 columns when it cannot be determined.
pub fn terminal_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH as usize)
}

/// Banner text without color codes, `width` columns wide (clamped).
pub fn format_banner(text: &str, width: usize) -> String {
    let width = width.clamp(MIN_BANNER_WIDTH, MAX_BANNER_WIDTH);
    let label = format!(" {} ", text);
    let label_len = label.chars().count();
    if label_len + 6 > width {
        return format!("━━━{}━━━", label);
    }
    let fill = width - label_len;
    let left = fill / 2;
    let right = fill - left;
    format!("{}{}{}", "━".repeat(left), label, "━".repeat(right))
}

/// Colored verdict banner for `pill`.
pub fn pill_banner(pill: &Pill, width: usize) -> String {
    let color = severity_color(pill.severity);
    format!("{color}{BOLD}{}{RESET}", format_banner(&pill.text, width))
}
