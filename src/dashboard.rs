//! Dashboard controller.
//!
//! [`Dashboard`] owns the client state (active tab, search text, last good
//! payload), the polling scheduler and the current view model. Every mutation
//! goes through a named operation here; presentation layers only read
//! [`Dashboard::view`].
//!
//! Fetches are split in two halves so the caller decides where the network
//! wait happens: [`Dashboard::begin_refresh`] issues a [`FetchTicket`], and
//! [`Dashboard::complete_refresh`] applies whatever the fetch produced.
//! Tickets carry a sequence number; a completion older than the newest one
//! already applied is dropped, so a slow early response can never overwrite a
//! fresher one.

use crate::config::Config;
use crate::error::{DashError, Result};
use crate::filter::{FilterTab, TestFilter};
use crate::payload::{parse_body, ResultPayload};
use crate::scheduler::{next_interval, PollingScheduler, RefreshKind};
use crate::source::ResultSource;
use crate::view::{select, RenderOptions, RenderState, ViewModel};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Session-lifetime client state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    pub filter: FilterTab,
    pub search: String,
    /// The most recent payload that was fetched and parsed successfully.
    pub last_payload: Option<ResultPayload>,
}

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    kind: RefreshKind,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn kind(&self) -> RefreshKind {
        self.kind
    }
}

/// What a completed fetch did to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A payload was accepted and rendered in the given state.
    Applied(RenderState),
    /// A loud refresh failed; the Error state is shown with this message.
    Failed(String),
    /// A quiet refresh failed; nothing changed.
    Suppressed,
    /// A newer completion was already applied; this one was dropped.
    Stale,
}

pub struct Dashboard {
    state: ClientState,
    scheduler: PollingScheduler,
    options: RenderOptions,
    view: ViewModel,
    next_seq: u64,
    /// Sequence number of the newest completion that changed the view.
    latest_applied: u64,
    in_flight: usize,
    /// Quiet fetches issued and not yet completed.
    quiet_in_flight: usize,
}

impl Dashboard {
    pub fn new(config: &Config) -> Self {
        let options = config.render_options();
        Self {
            state: ClientState::default(),
            scheduler: PollingScheduler::new(config.auto_refresh, config.interval()),
            view: ViewModel::initial(options.skeleton_rows),
            options,
            next_seq: 0,
            latest_applied: 0,
            in_flight: 0,
            quiet_in_flight: 0,
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn scheduler(&self) -> &PollingScheduler {
        &self.scheduler
    }

    /// Number of fetches issued and not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// The active tab and search as one predicate.
    pub fn filter(&self) -> TestFilter {
        TestFilter::new(self.state.filter, self.state.search.clone())
    }

    // ------------------------------------------------------------------
    // Filter and search (re-render from the last payload, no fetch)
    // ------------------------------------------------------------------

    pub fn set_filter(&mut self, tab: FilterTab) {
        self.state.filter = tab;
        self.rerender();
    }

    pub fn cycle_filter(&mut self) {
        self.set_filter(self.state.filter.next());
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.state.search = query.into();
        self.rerender();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.state.search.push(c);
        self.rerender();
    }

    pub fn pop_search_char(&mut self) {
        if self.state.search.pop().is_some() {
            self.rerender();
        }
    }

    pub fn clear_search(&mut self) {
        if !self.state.search.is_empty() {
            self.set_search(String::new());
        }
    }

    fn rerender(&mut self) {
        if let Some(payload) = &self.state.last_payload {
            self.view = select(payload, &self.filter(), &self.options);
        }
    }

    // ------------------------------------------------------------------
    // Polling settings
    // ------------------------------------------------------------------

    /// Arm the polling timer according to the current settings.
    pub fn start_polling(&mut self, now: Instant) {
        self.scheduler.start(now);
    }

    pub fn set_auto_refresh(&mut self, enabled: bool, now: Instant) {
        info!(enabled, "auto-refresh changed");
        self.scheduler.set_auto_refresh(enabled, now);
    }

    pub fn toggle_auto_refresh(&mut self, now: Instant) {
        self.set_auto_refresh(!self.scheduler.is_enabled(), now);
    }

    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        info!(interval_ms = interval.as_millis() as u64, "polling interval changed");
        self.scheduler.set_interval(interval, now);
    }

    pub fn cycle_interval(&mut self, now: Instant) {
        self.set_interval(next_interval(self.scheduler.interval()), now);
    }

    /// Issue a quiet refresh when the polling timer is due.
    ///
    /// A due tick is consumed without a fetch while an earlier quiet refresh
    /// is still outstanding, so a hung server never piles up requests.
    pub fn poll_timer(&mut self, now: Instant) -> Option<FetchTicket> {
        if !self.scheduler.poll(now) {
            return None;
        }
        if self.quiet_in_flight > 0 {
            debug!(pending = self.quiet_in_flight, "skipping poll, previous poll still in flight");
            return None;
        }
        Some(self.begin_refresh(RefreshKind::Quiet))
    }

    // ------------------------------------------------------------------
    // Refresh pipeline
    // ------------------------------------------------------------------

    /// Start a refresh. A loud refresh replaces the list with skeleton rows.
    pub fn begin_refresh(&mut self, kind: RefreshKind) -> FetchTicket {
        self.next_seq += 1;
        self.in_flight += 1;
        if kind.is_loud() {
            self.view = self.view.clone().with_loading(self.options.skeleton_rows);
        } else {
            self.quiet_in_flight += 1;
        }
        debug!(seq = self.next_seq, ?kind, "refresh issued");
        FetchTicket {
            seq: self.next_seq,
            kind,
        }
    }

    /// Apply the raw result of a fetch: parse, normalize, select the render
    /// state and rebuild the view.
    pub fn complete_refresh(&mut self, ticket: FetchTicket, body: Result<String>) -> RefreshOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !ticket.kind.is_loud() {
            self.quiet_in_flight = self.quiet_in_flight.saturating_sub(1);
        }

        if ticket.seq < self.latest_applied {
            debug!(
                seq = ticket.seq,
                latest = self.latest_applied,
                "dropping out-of-order response"
            );
            return RefreshOutcome::Stale;
        }

        match body.and_then(|b| parse_body(&b)) {
            Ok(payload) => {
                let view = select(&payload, &self.filter(), &self.options);
                let rendered = view.state;
                debug!(seq = ticket.seq, state = rendered.name(), tests = payload.tests.len(), "refresh applied");
                self.latest_applied = ticket.seq;
                self.view = view;
                self.state.last_payload = Some(payload);
                RefreshOutcome::Applied(rendered)
            }
            Err(err) if ticket.kind.is_loud() => {
                let message = failure_message(&err);
                warn!(seq = ticket.seq, error = %message, "refresh failed");
                self.latest_applied = ticket.seq;
                self.view = self.view.clone().into_error(message.clone());
                RefreshOutcome::Failed(message)
            }
            Err(err) => {
                debug!(seq = ticket.seq, error = %err, "ignoring failed background poll");
                RefreshOutcome::Suppressed
            }
        }
    }

    /// Run a whole refresh cycle synchronously against `source`.
    pub fn refresh_with(&mut self, source: &dyn ResultSource, kind: RefreshKind) -> RefreshOutcome {
        let ticket = self.begin_refresh(kind);
        let body = source.fetch();
        self.complete_refresh(ticket, body)
    }
}

fn failure_message(err: &DashError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::TestStatus;
    use crate::view::{ListView, Placeholder};

    const SETTLED: &str = r#"{
        "ok": true,
        "state": "done",
        "challenge": "failed",
        "tests": [
            {"name": "connect timeout", "status": "failed", "hint": "h1"},
            {"name": "parse", "status": "failed", "hint": "h2"},
            {"name": "connect timeout", "status": "passed", "hint": "h3"}
        ]
    }"#;

    fn dashboard() -> Dashboard {
        Dashboard::new(&Config::default())
    }

    fn apply(dash: &mut Dashboard, kind: RefreshKind, body: Result<String>) -> RefreshOutcome {
        let ticket = dash.begin_refresh(kind);
        dash.complete_refresh(ticket, body)
    }

    fn row_names(view: &ViewModel) -> Vec<String> {
        match &view.list {
            ListView::Rows(rows) => rows.iter().map(|r| r.name.clone()).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_new_dashboard_shows_loading() {
        let dash = dashboard();
        assert!(matches!(dash.view().list, ListView::Loading { rows: 6 }));
        assert!(dash.state().last_payload.is_none());
        assert_eq!(dash.state().filter, FilterTab::All);
        assert!(!dash.scheduler().is_active());
    }

    #[test]
    fn test_loud_refresh_shows_loading_until_complete() {
        let mut dash = dashboard();
        apply(&mut dash, RefreshKind::Loud, Ok(SETTLED.to_string()));
        let ticket = dash.begin_refresh(RefreshKind::Loud);
        assert!(matches!(dash.view().list, ListView::Loading { .. }));
        assert_eq!(dash.in_flight(), 1);
        dash.complete_refresh(ticket, Ok(SETTLED.to_string()));
        assert_eq!(dash.view().state, RenderState::Settled);
        assert_eq!(dash.in_flight(), 0);
    }

    #[test]
    fn test_quiet_refresh_does_not_show_loading() {
        let mut dash = dashboard();
        apply(&mut dash, RefreshKind::Loud, Ok(SETTLED.to_string()));
        let before = dash.view().clone();
        let _ticket = dash.begin_refresh(RefreshKind::Quiet);
        assert_eq!(dash.view(), &before);
    }

    #[test]
    fn test_successful_refresh_stores_payload() {
        let mut dash = dashboard();
        let outcome = apply(&mut dash, RefreshKind::Loud, Ok(SETTLED.to_string()));
        assert_eq!(outcome, RefreshOutcome::Applied(RenderState::Settled));
        let payload = dash.state().last_payload.as_ref().unwrap();
        assert_eq!(payload.tests.len(), 3);
        assert_eq!(payload.tests[1].status, TestStatus::Failed);
    }

    #[test]
    fn test_loud_transport_failure_shows_error_and_keeps_payload() {
        let mut dash = dashboard();
        apply(&mut dash, RefreshKind::Loud, Ok(SETTLED.to_string()));
        let payload_before = dash.state().last_payload.clone();

        let outcome = apply(
            &mut dash,
            RefreshKind::Loud,
            Err(DashError::Transport("connection refused".to_string())),
        );
        assert_eq!(outcome, RefreshOutcome::Failed("connection refused".to_string()));
        assert_eq!(dash.view().state, RenderState::Error);
        assert_eq!(
            dash.view().list,
            ListView::Placeholder(Placeholder::load_failed("connection refused"))
        );
        assert_eq!(dash.state().last_payload, payload_before);
    }

    #[test]
    fn test_loud_parse_failure_uses_body_text() {
        let mut dash = dashboard();
        let outcome = apply(&mut dash, RefreshKind::Loud, Ok("Internal Server Error".to_string()));
        assert_eq!(outcome, RefreshOutcome::Failed("Internal Server Error".to_string()));
        assert!(dash.state().last_payload.is_none());
    }

    #[test]
    fn test_quiet_failure_changes_nothing() {
        let mut dash = dashboard();
        apply(&mut dash, RefreshKind::Loud, Ok(SETTLED.to_string()));
        let view_before = dash.view().clone();
        let state_before = dash.state().clone();

        let outcome = apply(&mut dash, RefreshKind::Quiet, Ok("{not json".to_string()));
        assert_eq!(outcome, RefreshOutcome::Suppressed);
        let outcome = apply(
            &mut dash,
            RefreshKind::Quiet,
            Err(DashError::Transport("timed out".to_string())),
        );
        assert_eq!(outcome, RefreshOutcome::Suppressed);

        assert_eq!(dash.view(), &view_before);
        assert_eq!(dash.state(), &state_before);
    }

    #[test]
    fn test_filter_and_search_rerender_without_fetch() {
        let mut dash = dashboard();
        apply(&mut dash, RefreshKind::Loud, Ok(SETTLED.to_string()));
        assert_eq!(row_names(dash.view()).len(), 3);

        dash.set_filter(FilterTab::Failed);
        assert_eq!(row_names(dash.view()), vec!["connect timeout", "parse"]);

        dash.set_search("TIMEOUT");
        assert_eq!(row_names(dash.view()), vec!["connect timeout"]);

        dash.pop_search_char();
        assert_eq!(dash.state().search, "TIMEOU");

        dash.clear_search();
        dash.cycle_filter();
        assert_eq!(dash.state().filter, FilterTab::All);
        assert_eq!(row_names(dash.view()).len(), 3);
        assert_eq!(dash.in_flight(), 0);
    }

    #[test]
    fn test_filter_change_without_payload_only_updates_state() {
        let mut dash = dashboard();
        let before = dash.view().clone();
        dash.set_filter(FilterTab::Passed);
        dash.push_search_char('x');
        assert_eq!(dash.view(), &before);
        assert_eq!(dash.state().filter, FilterTab::Passed);
        assert_eq!(dash.state().search, "x");
    }

    #[test]
    fn test_out_of_order_response_is_dropped() {
        let mut dash = dashboard();
        let slow = dash.begin_refresh(RefreshKind::Loud);
        let fast = dash.begin_refresh(RefreshKind::Quiet);

        let running = r#"{"ok": true, "state": "running"}"#;
        assert_eq!(
            dash.complete_refresh(fast, Ok(running.to_string())),
            RefreshOutcome::Applied(RenderState::Running)
        );
        assert_eq!(
            dash.complete_refresh(slow, Ok(SETTLED.to_string())),
            RefreshOutcome::Stale
        );
        assert_eq!(dash.view().state, RenderState::Running);
        assert!(dash.state().last_payload.as_ref().unwrap().is_running());
        assert_eq!(dash.in_flight(), 0);
    }

    #[test]
    fn test_older_quiet_failure_after_newer_success_is_stale() {
        let mut dash = dashboard();
        let older = dash.begin_refresh(RefreshKind::Loud);
        let newer = dash.begin_refresh(RefreshKind::Loud);
        dash.complete_refresh(newer, Ok(SETTLED.to_string()));
        let outcome = dash.complete_refresh(older, Err(DashError::Transport("x".to_string())));
        assert_eq!(outcome, RefreshOutcome::Stale);
        assert_eq!(dash.view().state, RenderState::Settled);
    }

    #[test]
    fn test_poll_timer_issues_quiet_refresh() {
        let t0 = Instant::now();
        let mut dash = Dashboard::new(&Config {
            interval_ms: 1000,
            ..Config::default()
        });
        dash.start_polling(t0);
        assert!(dash.poll_timer(t0).is_none());
        let ticket = dash.poll_timer(t0 + Duration::from_millis(1000)).unwrap();
        assert_eq!(ticket.kind(), RefreshKind::Quiet);
        assert_eq!(ticket.seq(), 1);
    }

    #[test]
    fn test_poll_timer_skips_tick_while_quiet_refresh_outstanding() {
        let t0 = Instant::now();
        let mut dash = Dashboard::new(&Config {
            interval_ms: 1000,
            ..Config::default()
        });
        dash.start_polling(t0);
        let first = dash.poll_timer(t0 + Duration::from_millis(1000)).unwrap();

        // Server hangs: the next due tick is consumed without a second fetch.
        assert!(dash.poll_timer(t0 + Duration::from_millis(2000)).is_none());
        assert_eq!(dash.in_flight(), 1);

        // A loud refresh in flight does not hold back polling.
        let loud = dash.begin_refresh(RefreshKind::Loud);
        dash.complete_refresh(first, Ok(SETTLED.to_string()));
        let second = dash.poll_timer(t0 + Duration::from_millis(3000)).unwrap();
        assert_eq!(second.kind(), RefreshKind::Quiet);
        assert_eq!(dash.in_flight(), 2);

        dash.complete_refresh(loud, Ok(SETTLED.to_string()));
        dash.complete_refresh(second, Err(DashError::Transport("x".to_string())));
        assert!(dash.poll_timer(t0 + Duration::from_millis(4000)).is_some());
    }

    #[test]
    fn test_polling_settings_restart_single_timer() {
        let t0 = Instant::now();
        let mut dash = dashboard();
        dash.start_polling(t0);
        let first = dash.scheduler().active_timer_id();

        dash.cycle_interval(t0);
        assert_eq!(dash.scheduler().interval(), Duration::from_millis(5000));
        let second = dash.scheduler().active_timer_id();
        assert_ne!(first, second);

        dash.toggle_auto_refresh(t0);
        assert!(!dash.scheduler().is_active());
        assert!(dash.poll_timer(t0 + Duration::from_secs(60)).is_none());

        dash.toggle_auto_refresh(t0);
        assert!(dash.scheduler().is_active());
    }

    #[test]
    fn test_empty_error_message_gets_fallback() {
        let mut dash = dashboard();
        let outcome = apply(&mut dash, RefreshKind::Loud, Err(DashError::Transport(String::new())));
        assert_eq!(outcome, RefreshOutcome::Failed("Unknown error".to_string()));
    }
}
