//! Tab filter and free-text search over the test list.

use crate::payload::{TestCase, TestStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which status subset of tests is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterTab {
    #[default]
    All,
    Passed,
    Failed,
}

impl FilterTab {
    /// Returns the display name for this tab.
    pub fn name(&self) -> &'static str {
        match self {
            FilterTab::All => "All",
            FilterTab::Passed => "Passed",
            FilterTab::Failed => "Failed",
        }
    }

    /// Get all tabs in display order.
    pub fn all() -> &'static [FilterTab] {
        &[FilterTab::All, FilterTab::Passed, FilterTab::Failed]
    }

    /// Get the next tab in the cycle.
    pub fn next(&self) -> FilterTab {
        let tabs = FilterTab::all();
        let idx = tabs.iter().position(|t| t == self).unwrap_or(0);
        tabs[(idx + 1) % tabs.len()]
    }

    /// Position of this tab in [`FilterTab::all`].
    pub fn index(&self) -> usize {
        FilterTab::all()
            .iter()
            .position(|t| t == self)
            .unwrap_or(0)
    }

    pub fn accepts(&self, status: TestStatus) -> bool {
        match self {
            FilterTab::All => true,
            FilterTab::Passed => status == TestStatus::Passed,
            FilterTab::Failed => status == TestStatus::Failed,
        }
    }
}

impl fmt::Display for FilterTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FilterTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterTab::All),
            "passed" => Ok(FilterTab::Passed),
            "failed" => Ok(FilterTab::Failed),
            other => Err(format!(
                "unknown filter '{}', expected one of: all, passed, failed",
                other
            )),
        }
    }
}

/// Active tab plus search query, combined into one predicate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TestFilter {
    pub tab: FilterTab,
    /// Raw query as typed; trimmed and lowercased when matching.
    pub query: String,
}

impl TestFilter {
    pub fn new(tab: FilterTab, query: impl Into<String>) -> Self {
        Self {
            tab,
            query: query.into(),
        }
    }

    /// A filter that lets every test through.
    pub fn is_passthrough(&self) -> bool {
        self.tab == FilterTab::All && self.query.trim().is_empty()
    }

    pub fn matches(&self, test: &TestCase) -> bool {
        self.tab.accepts(test.status) && matches_query(test, &normalized_query(&self.query))
    }

    /// Tests that pass the filter, in their original order.
    pub fn apply<'a>(&self, tests: &'a [TestCase]) -> Vec<&'a TestCase> {
        if self.is_passthrough() {
            return tests.iter().collect();
        }
        tests.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Keep the tests matching both the tab and the (case-insensitive, trimmed)
/// substring query on `name` or `hint`. Relative order is preserved.
pub fn filter_tests<'a>(tests: &'a [TestCase], tab: FilterTab, query: &str) -> Vec<&'a TestCase> {
    TestFilter::new(tab, query).apply(tests)
}

fn normalized_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn matches_query(test: &TestCase, q: &str) -> bool {
    q.is_empty() || test.name.to_lowercase().contains(q) || test.hint.to_lowercase().contains(q)
}
