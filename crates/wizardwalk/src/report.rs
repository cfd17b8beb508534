//! The reporting sink test scenarios record their outcomes into.
//!
//! Entries are collected in order, tagged with the enclosing section, and
//! mirrored to `tracing` so a live run can be followed from the log. `fatal`
//! marks the current scenario failed without aborting the process; the walker
//! decides what to do with the rest of the run.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Pass,
    Fail,
    Warning,
    Fatal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub level: Level,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Default)]
struct ReporterState {
    entries: Vec<Entry>,
    sections: Vec<String>,
}

/// Shared, clone-able reporting handle.
#[derive(Clone, Default)]
pub struct Reporter {
    state: Arc<Mutex<ReporterState>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, level: Level, message: String, detail: Option<String>) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let section = state.sections.last().cloned();
        match level {
            Level::Pass => info!(section = section.as_deref(), "{message}"),
            Level::Fail => error!(section = section.as_deref(), "{message}"),
            Level::Warning => warn!(section = section.as_deref(), "{message}"),
            Level::Fatal => error!(section = section.as_deref(), detail = detail.as_deref(), "{message}"),
        }
        state.entries.push(Entry {
            level,
            section,
            message,
            detail,
            at: Utc::now(),
        });
    }

    pub fn pass(&self, message: impl Into<String>) {
        self.record(Level::Pass, message.into(), None);
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.record(Level::Fail, message.into(), None);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.record(Level::Warning, message.into(), None);
    }

    pub fn fatal(&self, message: impl Into<String>) {
        self.record(Level::Fatal, message.into(), None);
    }

    pub fn fatal_with(&self, message: impl Into<String>, detail: impl Into<String>) {
        self.record(Level::Fatal, message.into(), Some(detail.into()));
    }

    /// Record `message` as a pass or a fail depending on `condition`.
    /// Returns the condition so call sites can branch on it.
    pub fn verify(&self, condition: bool, message: impl Into<String>) -> bool {
        let message = message.into();
        if condition {
            self.pass(message);
        } else {
            self.fail(message);
        }
        condition
    }

    /// Compare two values, recording a pass on equality and a fail with both
    /// values otherwise. Returns whether they were equal.
    pub fn compare<T: PartialEq + Debug>(
        &self,
        actual: T,
        expected: T,
        message: impl Into<String>,
    ) -> bool {
        let message = message.into();
        if actual == expected {
            self.pass(message);
            true
        } else {
            self.record(
                Level::Fail,
                message,
                Some(format!("expected {expected:?}, got {actual:?}")),
            );
            false
        }
    }

    /// Open a named section; entries recorded while the guard lives are tagged
    /// with it. Sections nest.
    pub fn section(&self, name: impl Into<String>) -> SectionGuard {
        let name = name.into();
        info!(section = %name, "section start");
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .sections
            .push(name);
        SectionGuard {
            reporter: self.clone(),
        }
    }

    /// Snapshot everything recorded so far.
    pub fn report(&self) -> RunReport {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        RunReport::from_entries(state.entries.clone())
    }
}

/// Scope guard returned by [`Reporter::section`]; closes the section on drop.
pub struct SectionGuard {
    reporter: Reporter,
}

impl Drop for SectionGuard {
    fn drop(&mut self) {
        let mut state = self
            .reporter
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(name) = state.sections.pop() {
            info!(section = %name, "section end");
        }
    }
}

/// Serializable summary of one harness run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub entries: Vec<Entry>,
    pub passes: usize,
    pub failures: usize,
    pub warnings: usize,
    pub fatals: usize,
}

impl RunReport {
    fn from_entries(entries: Vec<Entry>) -> Self {
        let count = |level: Level| entries.iter().filter(|e| e.level == level).count();
        Self {
            passes: count(Level::Pass),
            failures: count(Level::Fail),
            warnings: count(Level::Warning),
            fatals: count(Level::Fatal),
            entries,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failures > 0 || self.fatals > 0
    }

    /// Pretty JSON rendering, for CI artifacts.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Entries recorded under the given section, in order.
    pub fn section_entries<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Entry> {
        self.entries
            .iter()
            .filter(move |e| e.section.as_deref() == Some(section))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_tagged_with_the_open_section() {
        let reporter = Reporter::new();
        reporter.pass("before any section");
        {
            let _section = reporter.section("Qt Empty Application");
            reporter.pass("inside");
        }
        reporter.pass("after");

        let report = reporter.report();
        assert_eq!(report.entries[0].section, None);
        assert_eq!(
            report.entries[1].section.as_deref(),
            Some("Qt Empty Application")
        );
        assert_eq!(report.entries[2].section, None);
    }

    #[test]
    fn verify_and_compare_record_matching_levels() {
        let reporter = Reporter::new();
        assert!(reporter.verify(true, "ok"));
        assert!(!reporter.verify(false, "not ok"));
        assert!(reporter.compare(2 + 2, 4, "arithmetic"));
        assert!(!reporter.compare("QtApp", "QtApplication", "names"));

        let report = reporter.report();
        assert_eq!(report.passes, 2);
        assert_eq!(report.failures, 2);
        assert!(report.has_failures());
        // the failed compare keeps both values for the log
        assert!(report.entries[3]
            .detail
            .as_deref()
            .unwrap()
            .contains("QtApplication"));
    }

    #[test]
    fn report_serializes_with_sections() {
        let reporter = Reporter::new();
        let _section = reporter.section("Qt Class Library");
        reporter.pass("Finish is enabled");
        let json = reporter.report().to_json().unwrap();
        assert!(json.contains("\"Qt Class Library\""));
        assert!(json.contains("\"pass\""));
    }

    #[test]
    fn fatal_counts_as_failure() {
        let reporter = Reporter::new();
        reporter.fatal_with("exception caught", "Timeout: no wizard window");
        let report = reporter.report();
        assert_eq!(report.fatals, 1);
        assert!(report.has_failures());
    }
}
