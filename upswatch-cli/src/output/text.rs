//! Text output formatting with colors.

use upswatch_core::{
    EventLog, EventRecord, SessionSource, SessionToken, Severity, TelemetryField,
    TelemetrySnapshot,
};
use upswatch_nmc::StatusReading;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Runtime below this many minutes is shown as critical.
const RUNTIME_CRITICAL_MINUTES: f64 = 10.0;

/// Runtime below this many minutes is shown as a warning.
const RUNTIME_LOW_MINUTES: f64 = 30.0;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats a telemetry snapshot.
    pub fn format_snapshot(&self, host: &str, snapshot: &TelemetrySnapshot) -> String {
        let mut lines = vec![self.bold(&format!("UPS {host}"))];

        if let Some(error) = &snapshot.error {
            lines.push(self.red(&format!("Parse error: {error}")));
        } else if !snapshot.has_data() {
            lines.push(self.yellow("No readings found on the status page"));
        }

        lines.push(format!(
            "{:<13}{:.2} A ({:.2} W)",
            "Load:", snapshot.load_in_ampere, snapshot.load_in_watt
        ));
        lines.push(format!("{:<13}{:.1} V", "Voltage:", snapshot.voltage));
        lines.push(format!("{:<13}{:.1} °C", "Temperature:", snapshot.temperature));
        let runtime = format_runtime(snapshot.runtime);
        lines.push(format!(
            "{:<13}{}",
            "Runtime:",
            self.color_for_runtime(snapshot.runtime, &runtime)
        ));

        lines.join("\n")
    }

    /// Formats per-field provenance.
    pub fn format_explain(&self, reading: &StatusReading) -> String {
        let mut lines = vec![self.bold("Resolved by")];

        let Some(outcome) = &reading.outcome else {
            lines.push(self.red("Extraction did not run"));
            return lines.join("\n");
        };

        for field in TelemetryField::ALL {
            let source = match outcome.resolved_by(field) {
                Some(id) => id.to_string(),
                None => self.dim("not found (0)"),
            };
            lines.push(format!("  {:<22} {}", field.display_name(), source));
        }
        lines.push(self.dim(&format!(
            "{} attempts in {:.1?}",
            outcome.attempts_count(),
            outcome.duration
        )));

        lines.join("\n")
    }

    /// Formats the event log, newest first.
    pub fn format_events(&self, host: &str, log: &EventLog) -> String {
        let mut lines = vec![self.bold(&format!("Recent events on {host} ({})", log.count))];

        if let Some(error) = &log.error {
            lines.push(self.red(&format!("Parse error: {error}")));
        }
        if log.is_empty() {
            lines.push(self.dim("No events"));
        }
        for event in &log.events {
            lines.push(self.format_event(event));
        }

        lines.join("\n")
    }

    fn format_event(&self, event: &EventRecord) -> String {
        let tag = format!("{:<7}", event.severity.as_str());
        let tag = match event.severity {
            Severity::Danger => self.red(&tag),
            Severity::Warning => self.yellow(&tag),
            Severity::Success => self.green(&tag),
            Severity::Info => self.dim(&tag),
        };
        format!("{} {}  {}  {}", event.date, event.time, tag, event.description)
    }

    /// Formats a login outcome.
    pub fn format_session(&self, host: &str, token: &SessionToken) -> String {
        match token.source() {
            SessionSource::Redirect => format!(
                "{} Logged in to {host} (session {token})",
                self.green("✓")
            ),
            SessionSource::Fallback { reason } => format!(
                "{} Login to {host} failed, using fallback session {token}: {reason}",
                self.yellow("!")
            ),
        }
    }

    /// Formats an error message.
    pub fn format_error(&self, host: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(host), self.red("Error"), error)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_runtime(&self, minutes: f64, text: &str) -> String {
        if minutes < RUNTIME_CRITICAL_MINUTES {
            self.red(text)
        } else if minutes < RUNTIME_LOW_MINUTES {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}

/// Formats minutes as "2 hr 9 min".
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_runtime(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    let (hours, mins) = (total / 60, total % 60);
    if hours > 0 {
        format!("{hours} hr {mins} min")
    } else {
        format!("{mins} min")
    }
}

// ============================================================================
// Tests
// ============================================================================
