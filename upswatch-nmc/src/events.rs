//! Event log parsing.
//!
//! The console's home page shows recent events in a table titled by a
//! sub-header. The table's position relative to the header varies between
//! firmware versions, so the search walks outward from the header before
//! settling for the first table on the page.

use chrono::{Local, NaiveDateTime, TimeZone};
use scraper::{ElementRef, Selector};
use tracing::{debug, instrument, warn};
use upswatch_core::{EventLog, EventRecord, Severity};
use upswatch_fetch::markup::{self, Document};

use crate::descriptor::{DeviceProfile, PagePlan};
use crate::error::NmcError;

/// Date/time layouts seen in event tables, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%y %H:%M:%S",
];

// ============================================================================
// Public API
// ============================================================================

/// Parses the event table from a page.
///
/// A page without an event sub-header yields an empty log. A profile whose
/// selectors do not compile yields an empty log carrying the error.
#[instrument(skip(html, profile), fields(len = html.len()))]
pub fn parse_events(html: &str, profile: &DeviceProfile) -> EventLog {
    match EventTableParser::new(&profile.pages) {
        Ok(parser) => parser.parse(&Document::parse(html)),
        Err(e) => {
            warn!(error = %e, "Cannot build event parser");
            EventLog::failed(e.to_string())
        }
    }
}

/// Parses an event's date and time cells into epoch milliseconds, local time.
pub fn parse_event_timestamp(date: &str, time: &str) -> Option<i64> {
    let combined = format!("{} {}", date.trim(), time.trim());
    let naive = TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&combined, fmt).ok())?;
    let millis = match Local.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.timestamp_millis(),
        // Nonexistent local time (DST gap).
        None => naive.and_utc().timestamp_millis(),
    };
    Some(millis)
}

// ============================================================================
// Parser
// ============================================================================

struct EventTableParser<'p> {
    plan: &'p PagePlan,
    header: Selector,
    table: Selector,
    row: Selector,
    cell: Selector,
}

impl<'p> EventTableParser<'p> {
    fn new(plan: &'p PagePlan) -> Result<Self, NmcError> {
        Ok(Self {
            plan,
            header: markup::compile(&plan.event_header)?,
            table: markup::compile("table")?,
            row: markup::compile("tr")?,
            cell: markup::compile("td")?,
        })
    }

    fn parse(&self, doc: &Document) -> EventLog {
        let needle = self.plan.event_header_text.to_lowercase();
        let Some(header) = doc
            .select_all(&self.header)
            .find(|h| markup::text_content(*h).to_lowercase().contains(&needle))
        else {
            debug!("No event header on page");
            return EventLog::default();
        };

        let Some(table) = self
            .table_near(header)
            .or_else(|| doc.select_first(&self.table))
        else {
            debug!("No event table on page");
            return EventLog::default();
        };

        let records = table
            .select(&self.row)
            .skip(1)
            .filter_map(|row| self.record(row))
            .collect();
        EventLog::from_records(records)
    }

    /// Searches following siblings of the header, then of each ancestor.
    fn table_near<'a>(&self, header: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let mut current = Some(header);
        for _ in 0..self.plan.event_search_depth {
            let el = current?;
            for sibling in markup::next_element_siblings(el) {
                if markup::is_table(sibling) {
                    return Some(sibling);
                }
                if let Some(nested) = sibling.select(&self.table).next() {
                    return Some(nested);
                }
            }
            current = markup::parent_element(el);
        }
        None
    }

    fn record(&self, row: ElementRef<'_>) -> Option<EventRecord> {
        let cells: Vec<String> = row
            .select(&self.cell)
            .map(|c| markup::text_content(c).trim().to_string())
            .collect();
        let [date, time, description, ..] = cells.as_slice() else {
            return None;
        };
        Some(EventRecord {
            timestamp: parse_event_timestamp(date, time),
            severity: Severity::from_classes(row.value().classes()),
            date: date.clone(),
            time: time.clone(),
            description: description.clone(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_event_timestamp("01/15/2024", "10:30:00").is_some());
        assert!(parse_event_timestamp("01/15/2024", "10:30").is_some());
        assert!(parse_event_timestamp("15.01.2024", "10:30:00").is_some());
        assert!(parse_event_timestamp("2024-01-15", "10:30:00").is_some());
        assert!(parse_event_timestamp("01/15/24", "10:30:00").is_some());
        assert_eq!(parse_event_timestamp("yesterday", "noon"), None);
    }

    #[test]
    fn test_timestamp_ordering() {
        let earlier = parse_event_timestamp("01/15/2024", "10:30:00").unwrap();
        let later = parse_event_timestamp("01/15/2024", "10:31:00").unwrap();
        assert_eq!(later - earlier, 60_000);
    }

    #[test]
    fn test_no_header_yields_empty_log() {
        let html = concat!(
            "<table><tr><th>h</th></tr>",
            "<tr><td>01/15/2024</td><td>10:30:00</td><td>x</td></tr></table>"
        );
        let log = parse_events(html, &DeviceProfile::nmc());
        assert!(log.is_empty());
        assert_eq!(log.count, 0);
        assert!(log.error.is_none());
    }

    #[test]
    fn test_table_in_parent_sibling() {
        let html = concat!(
            "<div><div class=\"dataSubHeader\"><span>Recent Device Events</span></div></div>",
            "<div><table>",
            "<tr><td>Date</td><td>Time</td><td>Event</td></tr>",
            "<tr class=\"text-warning\">",
            "<td>01/15/2024</td><td>10:30:00</td><td>On battery</td></tr>",
            "</table></div>"
        );
        let log = parse_events(html, &DeviceProfile::nmc());
        assert_eq!(log.count, 1);
        assert_eq!(log.events[0].description, "On battery");
        assert_eq!(log.events[0].severity, Severity::Warning);
    }

    #[test]
    fn test_falls_back_to_first_table() {
        let html = concat!(
            "<table><tr><td>Date</td><td>Time</td><td>Event</td></tr>",
            "<tr><td>01/15/2024</td><td>10:30:00</td><td>Self test passed</td></tr></table>",
            "<div><div class=\"dataSubHeader\">Events</div></div>"
        );
        let log = parse_events(html, &DeviceProfile::nmc());
        assert_eq!(log.count, 1);
        assert_eq!(log.events[0].description, "Self test passed");
    }

    #[test]
    fn test_short_rows_skipped() {
        let html = concat!(
            "<div class=\"dataSubHeader\">Events</div><table>",
            "<tr><td>Date</td><td>Time</td><td>Event</td></tr>",
            "<tr><td>only</td><td>two</td></tr>",
            "</table>"
        );
        let log = parse_events(html, &DeviceProfile::nmc());
        assert!(log.is_empty());
    }
}
