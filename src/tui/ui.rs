//! TUI layout and widget definitions.
//!
//! Draws a [`ViewModel`](crate::view::ViewModel); nothing here looks at the
//! payload itself.
//!
//! # Layout Structure
//!
//! ```text
//! ┌─────────────────── Header ───────────────────┐
//! │ harness-dash │ Challenge failed │ Last run: …│
//! ├─────────────────── Summary ──────────────────┤
//! │ Passed 3  Failed 2  Total 5                  │
//! │ [██████████████████░░░░░░░░░░░░] 60%         │
//! ├──────── Tests ─────────┬──────── Output ─────┤
//! │ All | Passed | Failed  │ Ran 5 tests          │
//! │ Search: timeout        │ ...                  │
//! │ test_a        PASSED   │                      │
//! ├─────────────────── Footer ───────────────────┤
//! │ auto 3s │ http://…/result │ r refresh  q quit │
//! └──────────────────────────────────────────────┘
//! ```

use super::app::{DashboardApp, InputMode};
use crate::filter::FilterTab;
use crate::view::{Badge, Counters, ListView, Placeholder, Severity, TestRow, ViewModel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

const COLOR_PRIMARY: Color = Color::Cyan;
const COLOR_SUCCESS: Color = Color::Green;
const COLOR_WARNING: Color = Color::Yellow;
const COLOR_ERROR: Color = Color::Red;
const COLOR_DIM: Color = Color::DarkGray;

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Ok => COLOR_SUCCESS,
        Severity::Bad => COLOR_ERROR,
        Severity::Warn => COLOR_WARNING,
    }
}

/// Render the whole dashboard.
pub fn render(frame: &mut Frame, app: &DashboardApp) {
    let view = app.dashboard().view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Counters + progress
            Constraint::Min(6),    // Tests | Output
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_summary(frame, view, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_tests(frame, app, view, body[0]);
    render_stdout(frame, app, view, body[1]);

    render_footer(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "harness-dash",
            Style::default()
                .fg(COLOR_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(COLOR_DIM)),
        Span::styled(
            view.pill.text.as_str(),
            Style::default()
                .fg(severity_color(view.pill.severity))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(COLOR_DIM)),
        Span::styled(view.timestamp.as_str(), Style::default().fg(Color::White)),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(COLOR_PRIMARY)),
    );
    frame.render_widget(header, area);
}

fn render_summary(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Summary ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let counter = |label: &'static str, value: Option<usize>, color: Color| {
        vec![
            Span::styled(label, Style::default().fg(COLOR_DIM)),
            Span::styled(
                Counters::display(value),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
        ]
    };
    let mut spans = counter("Passed ", view.counters.passed, COLOR_SUCCESS);
    spans.extend(counter("Failed ", view.counters.failed, COLOR_ERROR));
    spans.extend(counter("Total ", view.counters.total, Color::White));
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(COLOR_SUCCESS).bg(COLOR_DIM))
        .percent(u16::from(view.progress))
        .label(format!("{}%", view.progress));
    frame.render_widget(gauge, rows[1]);
}

fn render_tests(frame: &mut Frame, app: &DashboardApp, view: &ViewModel, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Tests ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Search
            Constraint::Min(0),    // List
        ])
        .split(inner);

    let state = app.dashboard().state();
    let titles: Vec<Line> = FilterTab::all().iter().map(|t| Line::from(t.name())).collect();
    let tabs = Tabs::new(titles)
        .select(state.filter.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(COLOR_PRIMARY)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let search = match app.input_mode() {
        InputMode::Search => Line::from(vec![
            Span::styled("/", Style::default().fg(COLOR_PRIMARY)),
            Span::styled(
                format!("{}▏", state.search),
                Style::default().fg(Color::White),
            ),
        ]),
        InputMode::Normal if state.search.is_empty() => Line::from(Span::styled(
            "Press / to search",
            Style::default().fg(COLOR_DIM),
        )),
        InputMode::Normal => Line::from(vec![
            Span::styled("Search: ", Style::default().fg(COLOR_DIM)),
            Span::styled(state.search.as_str(), Style::default().fg(Color::White)),
        ]),
    };
    frame.render_widget(Paragraph::new(search), chunks[1]);

    let items = list_items(&view.list, app.list_scroll());
    frame.render_widget(List::new(items), chunks[2]);
}

fn list_items(list: &ListView, scroll: usize) -> Vec<ListItem<'_>> {
    match list {
        ListView::Loading { rows } => (0..*rows)
            .map(|i| {
                let width = if i % 2 == 0 { 28 } else { 18 };
                ListItem::new(Line::from(Span::styled(
                    "░".repeat(width),
                    Style::default().fg(COLOR_DIM),
                )))
            })
            .collect(),
        ListView::Placeholder(placeholder) => vec![placeholder_item(placeholder)],
        ListView::Rows(rows) => {
            let start = scroll.min(rows.len().saturating_sub(1));
            rows.iter().skip(start).map(row_item).collect()
        }
    }
}

fn badge_span(badge: Badge) -> Span<'static> {
    Span::styled(
        format!(" {} ", badge.label),
        Style::default()
            .fg(severity_color(badge.severity))
            .add_modifier(Modifier::BOLD),
    )
}

fn placeholder_item(placeholder: &Placeholder) -> ListItem<'_> {
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                placeholder.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            badge_span(placeholder.badge),
        ]),
        Line::from(Span::styled(
            placeholder.hint.as_str(),
            Style::default().fg(COLOR_DIM),
        )),
    ])
}

fn row_item(row: &TestRow) -> ListItem<'_> {
    let mut lines = vec![Line::from(vec![
        badge_span(row.badge),
        Span::raw(" "),
        Span::styled(row.name.as_str(), Style::default().fg(Color::White)),
    ])];
    if !row.hint.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("   {}", row.hint),
            Style::default().fg(COLOR_DIM),
        )));
    }
    ListItem::new(lines)
}

fn render_stdout(frame: &mut Frame, app: &DashboardApp, view: &ViewModel, area: Rect) {
    let output = Paragraph::new(view.stdout.as_str())
        .wrap(Wrap { trim: false })
        .scroll((app.stdout_scroll(), 0))
        .block(Block::default().borders(Borders::ALL).title(" Output "));
    frame.render_widget(output, area);
}

fn render_footer(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let scheduler = app.dashboard().scheduler();
    let polling = if scheduler.is_enabled() {
        Span::styled(
            format!("auto {}s", scheduler.interval().as_millis() as f64 / 1000.0),
            Style::default().fg(COLOR_SUCCESS),
        )
    } else {
        Span::styled("auto off", Style::default().fg(COLOR_DIM))
    };

    let mut spans = vec![
        polling,
        Span::styled(" │ ", Style::default().fg(COLOR_DIM)),
        Span::styled(app.source_label(), Style::default().fg(Color::White)),
    ];
    if app.dashboard().in_flight() > 0 {
        spans.push(Span::styled(" │ ", Style::default().fg(COLOR_DIM)));
        spans.push(Span::styled("fetching…", Style::default().fg(COLOR_WARNING)));
    }
    spans.push(Span::styled(
        " │ r refresh  a auto  i interval  Tab filter  / search  q quit",
        Style::default().fg(COLOR_DIM),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
