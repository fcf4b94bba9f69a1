//! Progress bar and the spinner shown while a fetch is in flight.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::colors::*;

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Make a progress bar string for a 0..=100 percentage.
pub fn make_progress_bar(percent: u8, width: usize) -> String {
    let percent = usize::from(percent.min(100));
    let filled = (percent * width) / 100;
    let empty = width - filled;
    format!(
        "{GREEN}{}{RESET}{GRAY}{}{RESET}",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

/// Spinner on stderr while the result document is fetched.
///
/// Hidden automatically when stderr is not a terminal.
pub struct FetchSpinner {
    spinner: ProgressBar,
}

impl FetchSpinner {
    pub fn new(source: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars(SPINNER_CHARS)
                .template("{spinner:.cyan} Fetching {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(source.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    /// Clear the spinner line.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for FetchSpinner {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
