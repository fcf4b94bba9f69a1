//! Aggregate pass/fail counters.
//!
//! Counters are always taken from the full, unfiltered test list; the active
//! tab and search only change which rows are displayed.

use crate::payload::{TestCase, TestStatus};

/// Pass/fail/total counts for a sequence of tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl Counts {
    /// Percentage of passed tests, rounded half up. `0` when there are no tests.
    pub fn progress_percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        // round(p / t * 100) == floor((200p + t) / 2t) for non-negative p, t
        let pct = (200 * self.passed + self.total) / (2 * self.total);
        pct.min(100) as u8
    }
}

/// Count passed and failed tests. Running and unknown tests only count toward
/// `total`.
pub fn counts(tests: &[TestCase]) -> Counts {
    tests.iter().fold(
        Counts {
            total: tests.len(),
            ..Counts::default()
        },
        |mut acc, test| {
            match test.status {
                TestStatus::Passed => acc.passed += 1,
                TestStatus::Failed => acc.failed += 1,
                TestStatus::Running | TestStatus::Unknown => {}
            }
            acc
        },
    )
}
