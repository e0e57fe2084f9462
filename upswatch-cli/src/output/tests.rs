//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

const STATUS_PAGE: &str = concat!(
    "<html><body>\n",
    r#"<div class="dataField"><div class="dataName">"#,
    r#"<span id="langLoadCurrent">Load Current</span></div>"#,
    r#"<div class="dataValue">2.5&nbsp;A</div></div>"#,
    "\n",
    r#"<div class="dataField"><div class="dataName">"#,
    r#"<span id="langOutputVoltage">Output Voltage</span></div>"#,
    r#"<div class="dataValue">230.0&nbsp;VAC</div></div>"#,
    "\n",
    r#"<div class="dataField"><div class="dataName">"#,
    r#"<span id="langInternalTemp">Internal Temperature</span></div>"#,
    r#"<div class="dataValue">27.0°C</div></div>"#,
    "\n",
    r#"<div class="dataField"><div class="dataName">"#,
    r#"<span id="langRuntime">Runtime Remaining</span></div>"#,
    r#"<div class="dataValue">2hr 9min</div></div>"#,
    "\n",
    "</body></html>"
);

fn sample_log() -> upswatch_core::EventLog {
    use upswatch_core::{EventLog, EventRecord, Severity};

    EventLog::from_records(vec![
        EventRecord {
            date: "01/15/2024".to_string(),
            time: "10:30:00".to_string(),
            description: "UPS: On battery power.".to_string(),
            severity: Severity::Warning,
            timestamp: Some(1_705_314_600_000),
        },
        EventRecord {
            date: "01/14/2024".to_string(),
            time: "08:00:00".to_string(),
            description: "System: Network service started.".to_string(),
            severity: Severity::Info,
            timestamp: Some(1_705_219_200_000),
        },
    ])
}

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use super::{STATUS_PAGE, sample_log};
    use upswatch_core::{EventLog, SessionToken, TelemetrySnapshot};
    use upswatch_nmc::{DeviceProfile, read_status};

    #[test]
    fn test_snapshot_lists_every_measurement() {
        let formatter = TextFormatter::new(false);
        let snapshot = TelemetrySnapshot::from_readings(2.5, 230.0, 27.0, 129.0);
        let output = formatter.format_snapshot("ups1.local", &snapshot);

        assert!(output.contains("UPS ups1.local"));
        assert!(output.contains("2.50 A (575.00 W)"));
        assert!(output.contains("230.0 V"));
        assert!(output.contains("27.0 °C"));
        assert!(output.contains("2 hr 9 min"));
        assert!(!output.contains("Parse error"));
    }

    #[test]
    fn test_failed_snapshot_shows_error() {
        let formatter = TextFormatter::new(false);
        let snapshot = TelemetrySnapshot::failed("bad markup");
        let output = formatter.format_snapshot("ups1", &snapshot);

        assert!(output.contains("Parse error: bad markup"));
        assert!(output.contains("0 min"));
    }

    #[test]
    fn test_empty_snapshot_flagged() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_snapshot("ups1", &TelemetrySnapshot::default());
        assert!(output.contains("No readings found on the status page"));

        let snapshot = TelemetrySnapshot::from_readings(0.0, 230.0, 0.0, 0.0);
        let output = formatter.format_snapshot("ups1", &snapshot);
        assert!(!output.contains("No readings found"));
    }

    #[test]
    fn test_colors_only_when_enabled() {
        let snapshot = TelemetrySnapshot::from_readings(1.0, 230.0, 25.0, 5.0);
        let plain = TextFormatter::new(false).format_snapshot("ups1", &snapshot);
        let colored = TextFormatter::new(true).format_snapshot("ups1", &snapshot);

        assert!(!plain.contains('\x1b'));
        assert!(colored.contains("\x1b[31m5 min"));
    }

    #[test]
    fn test_explain_names_strategies() {
        let formatter = TextFormatter::new(false);
        let reading = read_status(STATUS_PAGE, &DeviceProfile::nmc());
        let output = formatter.format_explain(&reading);

        assert!(output.contains("Load Current"));
        assert!(output.contains("Runtime Remaining"));
        assert!(output.contains("nmc.anchor"));
        assert!(output.contains("attempts in"));
    }

    #[test]
    fn test_explain_unresolved_fields() {
        let formatter = TextFormatter::new(false);
        let reading = read_status(
            "<html><body><p>nothing</p></body></html>",
            &DeviceProfile::nmc(),
        );
        let output = formatter.format_explain(&reading);

        assert_eq!(output.matches("not found (0)").count(), 4);
    }

    #[test]
    fn test_events_listing() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_events("ups1", &sample_log());

        assert!(output.contains("Recent events on ups1 (2)"));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("01/15/2024 10:30:00  warning"));
        assert!(lines[1].ends_with("UPS: On battery power."));
        assert!(lines[2].contains("info"));
    }

    #[test]
    fn test_empty_events() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_events("ups1", &EventLog::default());
        assert!(output.contains("No events"));
    }

    #[test]
    fn test_session_outcomes() {
        let formatter = TextFormatter::new(false);

        let ok = formatter.format_session("ups1", &SessionToken::from_redirect("aBcD"));
        assert!(ok.contains("Logged in to ups1 (session aBcD)"));

        let fallback = formatter.format_session(
            "ups1",
            &SessionToken::fallback("default", "login form not found"),
        );
        assert!(fallback.contains("fallback session default"));
        assert!(fallback.contains("login form not found"));
    }

    #[test]
    fn test_error_line() {
        let formatter = TextFormatter::new(false);
        assert_eq!(
            formatter.format_error("ups1", "connection refused"),
            "ups1: Error - connection refused"
        );
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use super::{STATUS_PAGE, sample_log};
    use serde_json::Value;
    use upswatch_core::SessionToken;
    use upswatch_nmc::{DeviceProfile, read_status};

    fn parse(output: &str) -> Value {
        serde_json::from_str(output).expect("valid JSON")
    }

    #[test]
    fn test_status_flattens_snapshot() {
        let formatter = JsonFormatter::new(false);
        let reading = read_status(STATUS_PAGE, &DeviceProfile::nmc());
        let json = parse(&formatter.format_status("ups1", &reading, false).unwrap());

        assert_eq!(json["host"], "ups1");
        assert_eq!(json["loadInAmpere"], 2.5);
        assert_eq!(json["voltage"], 230.0);
        assert_eq!(json["loadInWatt"], 575.0);
        assert_eq!(json["temperature"], 27.0);
        assert_eq!(json["runtime"], 129.0);
        assert!(json.get("error").is_none());
        assert!(json.get("resolvedBy").is_none());
    }

    #[test]
    fn test_status_explain_adds_provenance() {
        let formatter = JsonFormatter::new(false);
        let reading = read_status(STATUS_PAGE, &DeviceProfile::nmc());
        let json = parse(&formatter.format_status("ups1", &reading, true).unwrap());

        let resolved = &json["resolvedBy"];
        for key in ["loadInAmpere", "voltage", "temperature", "runtime"] {
            assert_eq!(resolved[key], "nmc.anchor", "{key}");
        }
    }

    #[test]
    fn test_status_explain_unresolved_is_null() {
        let formatter = JsonFormatter::new(false);
        let reading = read_status("<html><body></body></html>", &DeviceProfile::nmc());
        let json = parse(&formatter.format_status("ups1", &reading, true).unwrap());

        assert!(json["resolvedBy"]["voltage"].is_null());
        assert_eq!(json["voltage"], 0.0);
    }

    #[test]
    fn test_events() {
        let formatter = JsonFormatter::new(false);
        let json = parse(&formatter.format_events("ups1", &sample_log()).unwrap());

        assert_eq!(json["host"], "ups1");
        assert_eq!(json["count"], 2);
        assert_eq!(json["events"][0]["type"], "warning");
        assert_eq!(json["events"][0]["date"], "01/15/2024");
        assert_eq!(json["events"][1]["description"], "System: Network service started.");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_session() {
        let formatter = JsonFormatter::new(false);

        let json = parse(
            &formatter
                .format_session("ups1", &SessionToken::from_redirect("aBcD"))
                .unwrap(),
        );
        assert_eq!(json["session"], "aBcD");
        assert_eq!(json["source"], "redirect");
        assert!(json.get("reason").is_none());

        let json = parse(
            &formatter
                .format_session("ups1", &SessionToken::fallback("default", "timeout"))
                .unwrap(),
        );
        assert_eq!(json["session"], "default");
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["reason"], "timeout");
    }

    #[test]
    fn test_pretty_output() {
        let formatter = JsonFormatter::new(true);
        let output = formatter.format_events("ups1", &sample_log()).unwrap();
        assert!(output.contains('\n'));
        assert!(output.contains("  \"host\""));
    }
}
