//! Plain-text rendering of a [`ViewModel`] for `harness-dash status`.

use std::fmt::Write;

use super::banner::{pill_banner, terminal_width};
use super::colors::*;
use super::progress::make_progress_bar;
use super::severity_color;
use crate::view::{Counters, ListView, Placeholder, TestRow, ViewModel};

const PROGRESS_WIDTH: usize = 30;

/// Render `view` as colored text, with the banner `width` columns wide.
///
/// Running state omits nothing the TUI shows except the skeleton rows;
/// `Loading` never reaches the printer because `status` waits for the fetch.
pub fn format_view(view: &ViewModel, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", pill_banner(&view.pill, width));

    let _ = writeln!(
        out,
        "{GRAY}Passed{RESET} {GREEN}{}{RESET}   {GRAY}Failed{RESET} {RED}{}{RESET}   {GRAY}Total{RESET} {}",
        Counters::display(view.counters.passed),
        Counters::display(view.counters.failed),
        Counters::display(view.counters.total),
    );
    let _ = writeln!(
        out,
        "{} {:>3}%",
        make_progress_bar(view.progress, PROGRESS_WIDTH),
        view.progress
    );
    let _ = writeln!(out, "{GRAY}{}{RESET}", view.timestamp);
    out.push('\n');

    match &view.list {
        ListView::Loading { .. } => {
            let _ = writeln!(out, "{GRAY}Loading…{RESET}");
        }
        ListView::Placeholder(placeholder) => write_placeholder(&mut out, placeholder),
        ListView::Rows(rows) => {
            for row in rows {
                write_row(&mut out, row);
            }
        }
    }

    if !view.stdout.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{BOLD}Output{RESET}");
        for line in view.stdout.lines() {
            let _ = writeln!(out, "{DIM}  {}{RESET}", line);
        }
    }
    out
}

fn write_placeholder(out: &mut String, placeholder: &Placeholder) {
    let color = severity_color(placeholder.badge.severity);
    let _ = writeln!(
        out,
        "{BOLD}{}{RESET} {color}[{}]{RESET}",
        placeholder.title, placeholder.badge.label
    );
    if !placeholder.hint.is_empty() {
        let _ = writeln!(out, "{GRAY}{}{RESET}", placeholder.hint);
    }
}

fn write_row(out: &mut String, row: &TestRow) {
    let color = severity_color(row.badge.severity);
    let _ = writeln!(
        out,
        "  {color}{:<8}{RESET} {}",
        row.badge.label, row.name
    );
    if !row.hint.is_empty() {
        let _ = writeln!(out, "  {GRAY}         {}{RESET}", row.hint);
    }
}

/// Print `view` to stdout.
pub fn print_view(view: &ViewModel) {
    print!("{}", format_view(view, terminal_width()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterTab, TestFilter};
    use crate::payload::parse_body;
    use crate::view::{select, RenderOptions};

    /// Drop ANSI escape sequences.
    fn plain(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    fn render(body: &str, filter: TestFilter) -> String {
        let payload = parse_body(body).unwrap();
        plain(&format_view(
            &select(&payload, &filter, &RenderOptions::default()),
            60,
        ))
    }

    #[test]
    fn test_format_settled_view() {
        let text = render(
            r#"{"ok": true, "state": "done", "challenge": "failed", "stdout": "line one\nline two",
                "tests": [{"name": "test_a", "status": "passed"},
                          {"name": "test_b", "status": "failed", "hint": "check b"}]}"#,
            TestFilter::default(),
        );
        assert!(text.contains(" Challenge failed "));
        assert!(text.contains("Passed 1   Failed 1   Total 2"));
        assert!(text.contains(" 50%"));
        assert!(text.contains("PASSED   test_a"));
        assert!(text.contains("FAILED   test_b"));
        assert!(text.contains("check b"));
        assert!(text.contains("Output\n  line one\n  line two\n"));
    }

    #[test]
    fn test_format_filtered_view() {
        let text = render(
            r#"{"ok": true, "state": "done",
                "tests": [{"name": "test_a", "status": "passed"},
                          {"name": "test_b", "status": "failed"}]}"#,
            TestFilter::new(FilterTab::Failed, ""),
        );
        assert!(!text.contains("test_a"));
        assert!(text.contains("test_b"));
        assert!(text.contains("Total 2"));
    }

    #[test]
    fn test_format_empty_view() {
        let text = render(r#"{"ok": false}"#, TestFilter::default());
        assert!(text.contains("Waiting for first run"));
        assert!(text.contains("Passed —   Failed —   Total —"));
        assert!(text.contains("No results yet [WAITING]"));
        assert!(!text.contains("Output"));
    }

    #[test]
    fn test_format_no_matches() {
        let text = render(
            r#"{"ok": true, "state": "done", "tests": [{"name": "a", "status": "passed"}]}"#,
            TestFilter::new(FilterTab::All, "zzz"),
        );
        assert!(text.contains("No matches [FILTER]"));
        assert!(text.contains("Try clearing search or switching tabs."));
    }

    #[test]
    fn test_plain_strips_codes() {
        assert_eq!(plain(&format!("{RED}x{RESET}y")), "xy");
    }
}
