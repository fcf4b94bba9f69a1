//! Result document model and normalization.
//!
//! The harness writes a loosely shaped JSON document (`result.json`, served at
//! `/result`). Any subset of its fields may be present and any of them may
//! carry the wrong type. [`normalize`] runs exactly once per fetched document
//! and turns whatever arrived into a fully populated [`ResultPayload`], so
//! nothing downstream ever checks for field presence.

use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Message used for a parse failure when the response body was empty.
pub const EMPTY_BODY_MESSAGE: &str = "Invalid JSON response from /result";

/// Outcome of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    /// Reported while the test has not finished yet.
    Running,
    #[default]
    Unknown,
}

impl TestStatus {
    fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("passed") => TestStatus::Passed,
            Some("failed") => TestStatus::Failed,
            Some("running") => TestStatus::Running,
            _ => TestStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Running => "running",
            TestStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle phase of the run as reported by the harness (`state`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunPhase {
    /// No phase reported.
    #[default]
    Pending,
    Running,
    Done,
    /// Any other marker the harness may emit (e.g. `missing`).
    Other(String),
}

impl RunPhase {
    pub fn is_running(&self) -> bool {
        matches!(self, RunPhase::Running)
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunPhase::Pending => "",
            RunPhase::Running => "running",
            RunPhase::Done => "done",
            RunPhase::Other(s) => s,
        }
    }
}

impl From<String> for RunPhase {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => RunPhase::Pending,
            "running" => RunPhase::Running,
            "done" => RunPhase::Done,
            _ => RunPhase::Other(s),
        }
    }
}

impl From<RunPhase> for String {
    fn from(phase: RunPhase) -> Self {
        match phase {
            RunPhase::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// Overall verdict of the challenge (`challenge`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Challenge {
    #[default]
    Undecided,
    Passed,
    Failed,
}

impl Challenge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Challenge::Undecided => "",
            Challenge::Passed => "passed",
            Challenge::Failed => "failed",
        }
    }
}

impl From<String> for Challenge {
    fn from(s: String) -> Self {
        match s.as_str() {
            "passed" => Challenge::Passed,
            "failed" => Challenge::Failed,
            _ => Challenge::Undecided,
        }
    }
}

impl From<Challenge> for String {
    fn from(challenge: Challenge) -> Self {
        challenge.as_str().to_string()
    }
}

/// One entry of the `tests` array. Identity is positional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub status: TestStatus,
    pub hint: String,
}

impl TestCase {
    pub fn new(name: impl Into<String>, status: TestStatus, hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            hint: hint.into(),
        }
    }

    fn from_value(value: &Value) -> Self {
        Self {
            name: coerce_string(value.get("name")),
            status: TestStatus::from_value(value.get("status")),
            hint: coerce_string(value.get("hint")),
        }
    }
}

/// A fully defaulted result document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultPayload {
    /// Whether a run has ever started. `false` means nothing to show yet.
    pub ok: bool,
    pub state: RunPhase,
    /// Shown as the hint text while no run exists.
    pub message: String,
    pub challenge: Challenge,
    /// Declaration order is significant and preserved.
    pub tests: Vec<TestCase>,
    pub stdout: String,
    /// ISO-8601 timestamp, or empty.
    pub timestamp: String,
}

impl ResultPayload {
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }
}

/// Turn an arbitrary JSON value into a well-formed [`ResultPayload`].
///
/// Never fails. Non-object input yields the all-default payload. The function
/// is idempotent: normalizing the serialized form of a normalized payload
/// returns an equal payload.
pub fn normalize(raw: &Value) -> ResultPayload {
    let tests = match raw.get("tests") {
        Some(Value::Array(items)) => items.iter().map(TestCase::from_value).collect(),
        _ => Vec::new(),
    };

    ResultPayload {
        ok: raw.get("ok").is_some_and(is_truthy),
        state: RunPhase::from(coerce_string(raw.get("state"))),
        message: coerce_string(raw.get("message")),
        challenge: Challenge::from(coerce_string(raw.get("challenge"))),
        tests,
        stdout: coerce_string(raw.get("stdout")),
        timestamp: coerce_string(raw.get("timestamp")),
    }
}

/// Parse a response body and normalize it.
///
/// A body that is not JSON (including an empty one) is a parse failure whose
/// message is the body itself, so whatever the server said ends up in front
/// of the user.
pub fn parse_body(body: &str) -> Result<ResultPayload> {
    let value: Value = serde_json::from_str(body).map_err(|_| {
        if body.trim().is_empty() {
            DashError::Parse(EMPTY_BODY_MESSAGE.to_string())
        } else {
            DashError::Parse(body.to_string())
        }
    })?;
    Ok(normalize(&value))
}

/// JavaScript truthiness, which is what the harness protocol assumes for `ok`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Falsy or absent values become `""`; strings are kept verbatim; anything
/// else is rendered as text.
fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(v) if !is_truthy(v) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}
