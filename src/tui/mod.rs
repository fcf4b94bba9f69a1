//! Live terminal dashboard.
//!
//! Shows the latest harness result and keeps it fresh:
//! - Summary pill, counters and progress bar
//! - Test list with All/Passed/Failed tabs and a search box
//! - Captured stdout of the last run
//!
//! Keys:
//! - r: Refresh now
//! - a: Toggle auto-refresh
//! - i: Cycle the polling interval
//! - Tab / 1 / 2 / 3: Switch tabs
//! - /: Search (Enter keeps the query, Esc clears it)
//! - Up/Down, PgUp/PgDn: Scroll the list and the output
//! - q / Esc: Quit

pub mod app;
pub mod ui;
pub mod worker;

pub use app::{DashboardApp, InputMode};
pub use worker::{spawn_fetch, Completion};

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::error::{DashError, Result};
use crate::source::ResultSource;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Upper bound on how long the loop waits for input before redrawing.
const TICK: Duration = Duration::from_millis(100);

pub type TuiResult<T> = std::result::Result<T, TuiError>;

/// Error types for the dashboard TUI.
#[derive(Debug)]
pub enum TuiError {
    /// IO error from terminal operations
    Io(io::Error),
    /// Error from dashboard operations
    Dash(DashError),
}

impl std::fmt::Display for TuiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuiError::Io(e) => write!(f, "Terminal error: {}", e),
            TuiError::Dash(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TuiError {}

impl From<io::Error> for TuiError {
    fn from(err: io::Error) -> Self {
        TuiError::Io(err)
    }
}

impl From<DashError> for TuiError {
    fn from(err: DashError) -> Self {
        TuiError::Dash(err)
    }
}

impl From<TuiError> for DashError {
    fn from(err: TuiError) -> Self {
        match err {
            TuiError::Io(e) => DashError::Io(e),
            TuiError::Dash(e) => e,
        }
    }
}

pub fn init_terminal() -> TuiResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> TuiResult<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the dashboard until the user quits.
///
/// Issues a loud refresh on startup and arms the polling timer once that
/// first response has been applied.
pub fn run_dashboard(config: &Config, source: Arc<dyn ResultSource>) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = init_terminal()?;
    let mut app = DashboardApp::new(Dashboard::new(config), source.describe());
    let result = event_loop(&mut terminal, &mut app, source);
    restore_terminal(&mut terminal)?;
    result.map_err(DashError::from)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut DashboardApp,
    source: Arc<dyn ResultSource>,
) -> TuiResult<()> {
    let (tx, rx) = mpsc::channel::<Completion>();
    info!(source = %source.describe(), "dashboard started");

    let initial = app.start();
    spawn_fetch(Arc::clone(&source), initial, tx.clone());

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        while let Ok((ticket, body)) = rx.try_recv() {
            app.apply_completion(ticket, body, Instant::now());
        }

        let now = Instant::now();
        if let Some(ticket) = app.dashboard_mut().poll_timer(now) {
            spawn_fetch(Arc::clone(&source), ticket, tx.clone());
        }

        let wait = app
            .dashboard()
            .scheduler()
            .time_until_next(now)
            .map_or(TICK, |d| d.min(TICK));

        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(ticket) = app.handle_key(key, Instant::now()) {
                        spawn_fetch(Arc::clone(&source), ticket, tx.clone());
                    }
                }
            }
        }

        if app.should_quit() {
            break;
        }
    }

    info!("dashboard stopped");
    Ok(())
}
