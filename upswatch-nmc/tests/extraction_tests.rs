//! Field extraction cascade over console page variants.

mod common;

use common::STATUS_PAGE;
use upswatch_core::{TelemetryField, TelemetrySnapshot};
use upswatch_nmc::{DeviceProfile, parse_status_page, read_status};

#[test]
fn test_anchored_page_resolves_every_field() {
    let reading = read_status(STATUS_PAGE, &DeviceProfile::nmc());
    for field in TelemetryField::ALL {
        assert_eq!(reading.resolved_by(field), Some("nmc.anchor"), "{field}");
    }
    assert_eq!(
        reading.snapshot,
        TelemetrySnapshot::from_readings(2.5, 230.0, 27.0, 129.0)
    );
}

#[test]
fn test_table_resolves_missing_anchor() {
    let html = r"<html><body><table>
        <tr><td>Load Current</td><td>4.1 Amps</td></tr>
        <tr><td>Output Voltage</td><td>120.0 VAC</td></tr>
        </table></body></html>";
    let reading = read_status(html, &DeviceProfile::nmc());
    assert_eq!(reading.snapshot.load_in_ampere, 4.1);
    assert_eq!(reading.snapshot.voltage, 120.0);
    assert_eq!(reading.snapshot.load_in_watt, 492.0);
    assert_eq!(
        reading.resolved_by(TelemetryField::LoadCurrent),
        Some("nmc.table")
    );
}

#[test]
fn test_runtime_label_container() {
    let html = concat!(
        "<html><body>",
        r#"<div class="dataField"><div class="dataName">"#,
        r#"<span id="langRuntimeRemaining">Runtime Remaining</span></div>"#,
        r#"<div class="dataValue">1hr 5min</div></div>"#,
        "</body></html>"
    );
    let reading = read_status(html, &DeviceProfile::nmc());
    assert_eq!(reading.snapshot.runtime, 65.0);
    assert_eq!(
        reading.resolved_by(TelemetryField::RuntimeRemaining),
        Some("nmc.runtime_label")
    );
}

#[test]
fn test_element_scan_resolves_loose_label() {
    let html = "<html><body><div><span>Temp: 31 C</span></div></body></html>";
    let reading = read_status(html, &DeviceProfile::nmc());
    assert_eq!(reading.snapshot.temperature, 31.0);
    assert_eq!(
        reading.resolved_by(TelemetryField::InternalTemperature),
        Some("nmc.element_scan")
    );
}

#[test]
fn test_proximity_resolves_free_text() {
    let filler = "lorem ipsum ".repeat(12);
    let html = format!(
        "<html><body><p>{filler} battery runtime is 2 hr 15 min {filler}</p></body></html>"
    );
    let reading = read_status(&html, &DeviceProfile::nmc());
    assert_eq!(reading.snapshot.runtime, 135.0);
    assert_eq!(
        reading.resolved_by(TelemetryField::RuntimeRemaining),
        Some("nmc.full_text")
    );
}

#[test]
fn test_missing_fields_default_to_zero() {
    let html = concat!(
        "<html><body><table>",
        "<tr><td>Output Voltage</td><td>230</td></tr>",
        "</table></body></html>"
    );
    let snap = parse_status_page(html, &DeviceProfile::nmc());
    assert_eq!(snap.voltage, 230.0);
    assert_eq!(snap.load_in_ampere, 0.0);
    assert_eq!(snap.load_in_watt, 0.0);
    assert_eq!(snap.runtime, 0.0);
}

#[test]
fn test_runtime_in_seconds_normalized() {
    let html = "<html><body><table><tr><td>Run Time</td><td>1200</td></tr></table></body></html>";
    let snap = parse_status_page(html, &DeviceProfile::nmc());
    assert_eq!(snap.runtime, 20.0);
}

#[test]
fn test_malformed_markup_does_not_fail() {
    let html = "<div><span id='langLoadCurrent'>Load</span></div></div></table><<>>";
    let snap = parse_status_page(html, &DeviceProfile::nmc());
    assert!(!snap.is_failed());
}
