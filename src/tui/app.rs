//! TUI application state and input handling.

use crate::dashboard::{Dashboard, FetchTicket, RefreshOutcome};
use crate::error::Result;
use crate::filter::FilterTab;
use crate::scheduler::RefreshKind;
use crate::view::ListView;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Whether keystrokes drive commands or edit the search query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// Lines scrolled by PageUp/PageDown in the output pane.
const STDOUT_PAGE: u16 = 10;

pub struct DashboardApp {
    dashboard: Dashboard,
    /// URL or path the results come from, shown in the footer.
    source_label: String,
    input_mode: InputMode,
    should_quit: bool,
    /// First visible row of the test list.
    list_scroll: usize,
    /// First visible line of the output pane.
    stdout_scroll: u16,
    /// The loud refresh issued at startup.
    initial: Option<FetchTicket>,
    polling_started: bool,
}

impl DashboardApp {
    pub fn new(dashboard: Dashboard, source_label: impl Into<String>) -> Self {
        Self {
            dashboard,
            source_label: source_label.into(),
            input_mode: InputMode::Normal,
            should_quit: false,
            list_scroll: 0,
            stdout_scroll: 0,
            initial: None,
            polling_started: false,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn list_scroll(&self) -> usize {
        self.list_scroll
    }

    pub fn stdout_scroll(&self) -> u16 {
        self.stdout_scroll
    }

    /// Issue the startup refresh. The polling timer stays unarmed until its
    /// completion has been applied.
    pub fn start(&mut self) -> FetchTicket {
        let ticket = self.dashboard.begin_refresh(RefreshKind::Loud);
        self.initial = Some(ticket);
        ticket
    }

    /// Apply a finished fetch. The startup refresh arms polling whatever its
    /// outcome; other completions never do.
    pub fn apply_completion(
        &mut self,
        ticket: FetchTicket,
        body: Result<String>,
        now: Instant,
    ) -> RefreshOutcome {
        let outcome = self.dashboard.complete_refresh(ticket, body);
        if !self.polling_started && self.initial == Some(ticket) {
            self.dashboard.start_polling(now);
            self.polling_started = true;
        }
        self.list_scroll = self.list_scroll.min(self.last_row());
        outcome
    }

    /// Index of the last row in the test list, 0 when there are none.
    fn last_row(&self) -> usize {
        match &self.dashboard.view().list {
            ListView::Rows(rows) => rows.len().saturating_sub(1),
            _ => 0,
        }
    }

    /// Handle a key press. Returns a ticket when the key asked for a refresh;
    /// the caller is responsible for running the fetch.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<FetchTicket> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        match self.input_mode {
            InputMode::Search => {
                self.handle_search_key(key.code);
                None
            }
            InputMode::Normal => self.handle_normal_key(key.code, now),
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Esc => {
                self.dashboard.clear_search();
                self.input_mode = InputMode::Normal;
                self.list_scroll = 0;
            }
            KeyCode::Backspace => {
                self.dashboard.pop_search_char();
                self.list_scroll = 0;
            }
            KeyCode::Char(c) => {
                self.dashboard.push_search_char(c);
                self.list_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode, now: Instant) -> Option<FetchTicket> {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.list_scroll = 0;
                return Some(self.dashboard.begin_refresh(RefreshKind::Loud));
            }
            KeyCode::Char('a') => self.dashboard.toggle_auto_refresh(now),
            KeyCode::Char('i') => self.dashboard.cycle_interval(now),
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Tab => self.select_tab(self.dashboard.state().filter.next()),
            KeyCode::Char('1') => self.select_tab(FilterTab::All),
            KeyCode::Char('2') => self.select_tab(FilterTab::Passed),
            KeyCode::Char('3') => self.select_tab(FilterTab::Failed),
            KeyCode::Up => self.list_scroll = self.list_scroll.saturating_sub(1),
            KeyCode::Down => self.list_scroll = (self.list_scroll + 1).min(self.last_row()),
            KeyCode::PageUp => self.stdout_scroll = self.stdout_scroll.saturating_sub(STDOUT_PAGE),
            KeyCode::PageDown => {
                self.stdout_scroll = self.stdout_scroll.saturating_add(STDOUT_PAGE)
            }
            _ => {}
        }
        None
    }

    fn select_tab(&mut self, tab: FilterTab) {
        self.dashboard.set_filter(tab);
        self.list_scroll = 0;
    }
}
