//! Render-state selection and the view model handed to presentation layers.
//!
//! [`select`] is a pure function of a normalized payload and the active
//! filter. It decides which of the four render states applies and builds
//! everything a presentation layer needs to draw it. Presentation code (the
//! TUI, the plain-text `status` printer) never looks at payload fields.

use crate::counts::{counts, Counts};
use crate::filter::TestFilter;
use crate::payload::{Challenge, ResultPayload, TestStatus};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Shown in place of a counter or timestamp when there is nothing to show.
pub const PLACEHOLDER: &str = "—";

/// Hint shown while no run exists and the harness did not send a message.
pub const DEFAULT_WAITING_HINT: &str =
    "Start writing your solution, then run the test suite (e.g. `python main.py`).";

/// Default number of skeleton rows while a loud refresh is in flight.
pub const DEFAULT_SKELETON_ROWS: usize = 6;

/// Which view applies to the current payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// No run has ever started (`ok == false`).
    Empty,
    /// A run is in progress.
    Running,
    /// A run has finished, passed or failed.
    Settled,
    /// The result document could not be fetched or parsed.
    Error,
}

impl RenderState {
    pub fn name(&self) -> &'static str {
        match self {
            RenderState::Empty => "empty",
            RenderState::Running => "running",
            RenderState::Settled => "settled",
            RenderState::Error => "error",
        }
    }
}

/// Visual weight of a pill or badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Bad,
    Warn,
}

/// The top-of-view summary indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pill {
    pub text: String,
    pub severity: Severity,
}

impl Pill {
    fn new(text: &str, severity: Severity) -> Self {
        Self {
            text: text.to_string(),
            severity,
        }
    }

    /// Pill for a payload that has a run. A running phase takes precedence
    /// over the challenge verdict.
    pub fn for_run(payload: &ResultPayload) -> Self {
        if payload.is_running() {
            return Pill::new("Tests are running…", Severity::Warn);
        }
        match payload.challenge {
            Challenge::Passed => Pill::new("Challenge passed", Severity::Ok),
            Challenge::Failed => Pill::new("Challenge failed", Severity::Bad),
            Challenge::Undecided => Pill::new("Waiting…", Severity::Warn),
        }
    }

    pub fn waiting_for_first_run() -> Self {
        Pill::new("Waiting for first run", Severity::Warn)
    }
}

/// A short status label attached to a list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub severity: Severity,
}

impl Badge {
    pub const PASSED: Badge = Badge::new("PASSED", Severity::Ok);
    pub const FAILED: Badge = Badge::new("FAILED", Severity::Bad);
    pub const UNKNOWN: Badge = Badge::new("UNKNOWN", Severity::Warn);
    pub const WAITING: Badge = Badge::new("WAITING", Severity::Warn);
    pub const RUNNING: Badge = Badge::new("RUNNING", Severity::Warn);
    pub const EMPTY: Badge = Badge::new("EMPTY", Severity::Warn);
    pub const FILTER: Badge = Badge::new("FILTER", Severity::Warn);
    pub const ERROR: Badge = Badge::new("ERROR", Severity::Bad);

    const fn new(label: &'static str, severity: Severity) -> Self {
        Self { label, severity }
    }

    pub fn for_status(status: TestStatus) -> Self {
        match status {
            TestStatus::Passed => Badge::PASSED,
            TestStatus::Failed => Badge::FAILED,
            TestStatus::Running => Badge::RUNNING,
            TestStatus::Unknown => Badge::UNKNOWN,
        }
    }
}

/// Counter values; `None` renders as [`PLACEHOLDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counters {
    pub passed: Option<usize>,
    pub failed: Option<usize>,
    pub total: Option<usize>,
}

impl Counters {
    pub fn placeholders() -> Self {
        Self::default()
    }

    /// Values are shown only when there is at least one test.
    fn from_counts(c: Counts) -> Self {
        if c.total == 0 {
            return Self::placeholders();
        }
        Self {
            passed: Some(c.passed),
            failed: Some(c.failed),
            total: Some(c.total),
        }
    }

    pub fn display(value: Option<usize>) -> String {
        value
            .map(|v| v.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

/// One displayed test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRow {
    pub name: String,
    pub hint: String,
    pub badge: Badge,
}

/// A fixed message occupying the whole list area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub title: String,
    pub badge: Badge,
    pub hint: String,
}

impl Placeholder {
    fn new(title: &str, badge: Badge, hint: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            badge,
            hint: hint.into(),
        }
    }

    pub fn waiting(hint: impl Into<String>) -> Self {
        Placeholder::new("No results yet", Badge::WAITING, hint)
    }

    pub fn running() -> Self {
        Placeholder::new(
            "Tests are still running…",
            Badge::RUNNING,
            "Please wait until the run finishes, then refresh.",
        )
    }

    pub fn no_tests() -> Self {
        Placeholder::new(
            "No tests to display",
            Badge::EMPTY,
            "Run the test suite and refresh.",
        )
    }

    pub fn no_matches() -> Self {
        Placeholder::new(
            "No matches",
            Badge::FILTER,
            "Try clearing search or switching tabs.",
        )
    }

    pub fn load_failed(message: impl Into<String>) -> Self {
        Placeholder::new("Failed to load /result", Badge::ERROR, message)
    }
}

/// Content of the list area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Skeleton rows shown while a user-requested refresh is in flight.
    Loading { rows: usize },
    Placeholder(Placeholder),
    Rows(Vec<TestRow>),
}

/// Everything a presentation layer needs to draw one frame of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub state: RenderState,
    pub pill: Pill,
    pub counters: Counters,
    /// 0..=100
    pub progress: u8,
    /// `Last run: …` or [`PLACEHOLDER`].
    pub timestamp: String,
    pub stdout: String,
    pub list: ListView,
}

impl ViewModel {
    /// View shown before the first response arrives.
    pub fn initial(skeleton_rows: usize) -> Self {
        Self {
            state: RenderState::Empty,
            pill: Pill::new("Waiting…", Severity::Warn),
            counters: Counters::placeholders(),
            progress: 0,
            timestamp: PLACEHOLDER.to_string(),
            stdout: String::new(),
            list: ListView::Loading {
                rows: skeleton_rows,
            },
        }
    }

    /// Replace the list with skeleton rows, keeping the summary.
    pub fn with_loading(mut self, rows: usize) -> Self {
        self.list = ListView::Loading { rows };
        self
    }

    /// Error state: the list shows the failure; the summary keeps whatever was
    /// rendered before.
    pub fn into_error(mut self, message: impl Into<String>) -> Self {
        self.state = RenderState::Error;
        self.list = ListView::Placeholder(Placeholder::load_failed(message));
        self
    }
}

/// Options that shape the view without depending on the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub waiting_hint: String,
    pub skeleton_rows: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            waiting_hint: DEFAULT_WAITING_HINT.to_string(),
            skeleton_rows: DEFAULT_SKELETON_ROWS,
        }
    }
}

/// Decide the render state for a normalized payload.
///
/// `ok` is checked before `state`; exactly one state applies. The Error state
/// never comes out of here because it is decided before a payload exists.
pub fn classify(payload: &ResultPayload) -> RenderState {
    if !payload.ok {
        RenderState::Empty
    } else if payload.is_running() {
        RenderState::Running
    } else {
        RenderState::Settled
    }
}

/// Build the view model for a normalized payload.
pub fn select(payload: &ResultPayload, filter: &TestFilter, options: &RenderOptions) -> ViewModel {
    match classify(payload) {
        RenderState::Empty => empty_view(payload, options),
        RenderState::Running => {
            let mut view = summary_view(RenderState::Running, payload);
            view.list = ListView::Placeholder(Placeholder::running());
            view
        }
        RenderState::Settled | RenderState::Error => {
            let mut view = summary_view(RenderState::Settled, payload);
            view.list = settled_list(payload, filter);
            view
        }
    }
}

fn empty_view(payload: &ResultPayload, options: &RenderOptions) -> ViewModel {
    let hint = if payload.message.is_empty() {
        options.waiting_hint.clone()
    } else {
        payload.message.clone()
    };
    ViewModel {
        state: RenderState::Empty,
        pill: Pill::waiting_for_first_run(),
        counters: Counters::placeholders(),
        progress: 0,
        timestamp: PLACEHOLDER.to_string(),
        stdout: String::new(),
        list: ListView::Placeholder(Placeholder::waiting(hint)),
    }
}

/// Summary fields shared by Running and Settled. Counters are taken from the
/// unfiltered test list.
fn summary_view(state: RenderState, payload: &ResultPayload) -> ViewModel {
    let c = counts(&payload.tests);
    ViewModel {
        state,
        pill: Pill::for_run(payload),
        counters: Counters::from_counts(c),
        progress: c.progress_percent(),
        timestamp: format_timestamp(&payload.timestamp),
        stdout: payload.stdout.clone(),
        list: ListView::Rows(Vec::new()),
    }
}

fn settled_list(payload: &ResultPayload, filter: &TestFilter) -> ListView {
    if payload.tests.is_empty() {
        return ListView::Placeholder(Placeholder::no_tests());
    }
    let rows: Vec<TestRow> = filter
        .apply(&payload.tests)
        .into_iter()
        .map(|t| TestRow {
            name: t.name.clone(),
            hint: t.hint.clone(),
            badge: Badge::for_status(t.status),
        })
        .collect();
    if rows.is_empty() {
        ListView::Placeholder(Placeholder::no_matches())
    } else {
        ListView::Rows(rows)
    }
}

/// `Last run: <local time>` for a parseable timestamp, `Last run: <raw>` for an
/// unparseable one, [`PLACEHOLDER`] when empty.
pub fn format_timestamp(raw: &str) -> String {
    if raw.is_empty() {
        return PLACEHOLDER.to_string();
    }
    format!("Last run: {}", format_time(raw))
}

fn format_time(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY).to_string();
    }
    // Offset-less ISO timestamps are taken as local time.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        if let Some(local) = Local.from_local_datetime(&naive).earliest() {
            return local.format(DISPLAY).to_string();
        }
    }
    raw.to_string()
}
