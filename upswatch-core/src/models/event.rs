//! Event log types.
//!
//! - [`EventLog`] - Recent device events, newest first
//! - [`EventRecord`] - One row of the device's event table
//! - [`Severity`] - Classification derived from the row's marker class

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Severity
// ============================================================================

/// Severity classification of a device event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational (also used for unknown markers).
    #[default]
    Info,
    /// Successful operation, e.g. returned from battery.
    Success,
    /// Warning condition.
    Warning,
    /// Critical condition.
    Danger,
}

impl Severity {
    /// Classifies a row from its CSS classes.
    ///
    /// Recognizes `text-success`, `text-warning`, and `text-danger`, in that
    /// order of precedence. Anything else is [`Severity::Info`].
    pub fn from_classes<'a>(classes: impl IntoIterator<Item = &'a str>) -> Self {
        let mut found = Self::Info;
        for class in classes {
            let candidate = match class {
                "text-success" => Self::Success,
                "text-warning" => Self::Warning,
                "text-danger" => Self::Danger,
                _ => continue,
            };
            if found == Self::Info || candidate.precedence() < found.precedence() {
                found = candidate;
            }
        }
        found
    }

    fn precedence(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Warning => 1,
            Self::Danger => 2,
            Self::Info => 3,
        }
    }

    /// Returns the lowercase label for this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Event Record
// ============================================================================

/// A single device event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Date text as shown by the device.
    pub date: String,
    /// Time text as shown by the device.
    pub time: String,
    /// Event description.
    pub description: String,
    /// Severity classification.
    #[serde(rename = "type")]
    pub severity: Severity,
    /// Milliseconds since the Unix epoch, if date and time could be parsed.
    pub timestamp: Option<i64>,
}

// ============================================================================
// Event Log
// ============================================================================

/// Recent device events, sorted newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    /// Events sorted by timestamp, descending. Undated events come last.
    pub events: Vec<EventRecord>,
    /// Number of events.
    pub count: usize,
    /// Description of a failure that prevented parsing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EventLog {
    /// Builds a log from unordered records.
    pub fn from_records(mut events: Vec<EventRecord>) -> Self {
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        let count = events.len();
        Self {
            events,
            count,
            error: None,
        }
    }

    /// Creates an empty log annotated with an error.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Returns true if the log holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(description: &str, timestamp: Option<i64>) -> EventRecord {
        EventRecord {
            date: String::new(),
            time: String::new(),
            description: description.to_string(),
            severity: Severity::Info,
            timestamp,
        }
    }

    #[test]
    fn test_log_sorted_newest_first() {
        let log = EventLog::from_records(vec![
            record("t2", Some(2_000)),
            record("t1", Some(1_000)),
            record("t3", Some(3_000)),
        ]);
        let order: Vec<&str> = log.events.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(order, vec!["t3", "t2", "t1"]);
        assert_eq!(log.count, 3);
    }

    #[test]
    fn test_undated_events_sort_last() {
        let log = EventLog::from_records(vec![record("undated", None), record("dated", Some(5))]);
        assert_eq!(log.events[0].description, "dated");
        assert_eq!(log.events[1].description, "undated");
    }

    #[test]
    fn test_severity_from_classes() {
        assert_eq!(Severity::from_classes(["row", "text-danger"]), Severity::Danger);
        assert_eq!(Severity::from_classes(["text-warning"]), Severity::Warning);
        assert_eq!(Severity::from_classes(["text-success", "text-danger"]), Severity::Success);
        assert_eq!(Severity::from_classes(["text-critical"]), Severity::Info);
        assert_eq!(Severity::from_classes([]), Severity::Info);
    }

    #[test]
    fn test_failed_log_is_empty() {
        let log = EventLog::failed("no table");
        assert!(log.is_empty());
        assert_eq!(log.count, 0);
        assert_eq!(log.error.as_deref(), Some("no table"));
    }
}
