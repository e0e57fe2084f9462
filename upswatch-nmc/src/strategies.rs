//! Extraction strategies for the NMC status page.
//!
//! Each strategy encodes one assumption about where a reading lives. The
//! profile's pipeline runs them in this order, per field:
//!
//! 1. [`AnchorStrategy`]: the value node next to a known label id
//! 2. [`TableScanStrategy`]: a table row mentioning the field
//! 3. [`RuntimeLabelStrategy`]: the runtime-remaining value container
//! 4. [`ElementScanStrategy`]: any short element mentioning the field
//! 5. [`FullTextStrategy`]: a number near a keyword in the raw source

use scraper::Selector;
use tracing::trace;
use upswatch_core::TelemetryField;
use upswatch_fetch::markup::{self, Document};
use upswatch_fetch::{ExtractionStrategy, StrategyKind};

use crate::descriptor::AnchorIds;
use crate::error::NmcError;
use crate::parser::{
    has_duration_marker, parse_duration, parse_duration_near, parse_leading_float, parse_number,
    window_around,
};

/// Elements with this much text or more are containers, not labels.
const ELEMENT_TEXT_LIMIT: usize = 100;

/// Characters searched on either side of a full-text keyword.
const PROXIMITY_RADIUS: usize = 100;

// ============================================================================
// Keyword Classification
// ============================================================================

/// Returns true if lower-cased label text mentions `field`.
pub fn mentions(text: &str, field: TelemetryField) -> bool {
    let keywords: &[&str] = match field {
        TelemetryField::LoadCurrent => &["load", "current", "ampere"],
        TelemetryField::OutputVoltage => &["voltage", "volt"],
        TelemetryField::InternalTemperature => &["temp", "°c"],
        TelemetryField::RuntimeRemaining => &["runtime", "run time", "remaining"],
    };
    keywords.iter().any(|k| text.contains(k))
}

/// Reads a value for `field` out of lower-cased label text.
///
/// Runtime prefers duration tokens when present.
fn read_classified(text: &str, field: TelemetryField) -> Option<f64> {
    if !mentions(text, field) {
        return None;
    }
    if field == TelemetryField::RuntimeRemaining && has_duration_marker(text) {
        if let Some(minutes) = parse_duration(text) {
            return Some(minutes);
        }
    }
    parse_number(text)
}

/// Keywords searched by the full-text scan, in order.
fn proximity_keywords(field: TelemetryField) -> &'static [&'static str] {
    match field {
        TelemetryField::LoadCurrent => &["load", "current", "ampere", "amp"],
        TelemetryField::OutputVoltage => &["voltage", "volt", "v"],
        TelemetryField::InternalTemperature => &["temperature", "temp", "°c"],
        TelemetryField::RuntimeRemaining => &["runtime", "remaining"],
    }
}

// ============================================================================
// Anchor Strategy
// ============================================================================

/// Reads the value node beside a known label element.
///
/// The console renders each reading as
/// `<div><div><span id="langX">Label</span></div><div>VALUE</div></div>`,
/// so the value is the first text node of the second child of the label's
/// grandparent.
pub struct AnchorStrategy {
    selectors: [Selector; 4],
}

impl AnchorStrategy {
    /// Compiles the anchor selectors from a profile.
    pub fn new(anchors: &AnchorIds) -> Result<Self, NmcError> {
        Ok(Self {
            selectors: [
                markup::compile(anchors.for_field(TelemetryField::LoadCurrent))?,
                markup::compile(anchors.for_field(TelemetryField::OutputVoltage))?,
                markup::compile(anchors.for_field(TelemetryField::InternalTemperature))?,
                markup::compile(anchors.for_field(TelemetryField::RuntimeRemaining))?,
            ],
        })
    }

    /// Parses the raw value node text.
    pub fn parse_value(text: &str) -> Option<f64> {
        let text = text.trim();
        if text.contains("°C") {
            parse_leading_float(&text.replace("°C", ""))
        } else if has_duration_marker(text) {
            parse_duration(text)
        } else {
            parse_leading_float(text)
        }
    }
}

impl ExtractionStrategy for AnchorStrategy {
    fn id(&self) -> &str {
        "nmc.anchor"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Selector
    }

    fn extract(&self, doc: &Document, field: TelemetryField) -> Option<f64> {
        let anchor = doc.select_first(&self.selectors[field.index()])?;
        let row = markup::ancestor(anchor, 2)?;
        let text = markup::child_first_text(row, 1)?;
        trace!(field = %field, text = %text.trim(), "Anchor value node");
        Self::parse_value(&text)
    }
}

// ============================================================================
// Table Scan Strategy
// ============================================================================

/// Classifies table rows by keyword and reads the first number in each.
pub struct TableScanStrategy {
    rows: Selector,
}

impl TableScanStrategy {
    /// Creates the strategy.
    pub fn new() -> Result<Self, NmcError> {
        Ok(Self {
            rows: markup::compile("table tr")?,
        })
    }
}

impl ExtractionStrategy for TableScanStrategy {
    fn id(&self) -> &str {
        "nmc.table"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Tabular
    }

    fn extract(&self, doc: &Document, field: TelemetryField) -> Option<f64> {
        doc.select_all(&self.rows)
            .map(|row| markup::text_content(row).to_lowercase())
            .find_map(|text| read_classified(&text, field))
    }
}

// ============================================================================
// Runtime Label Strategy
// ============================================================================

/// Reads the runtime-remaining value container as a duration.
pub struct RuntimeLabelStrategy {
    label: Selector,
    container: Selector,
    value: Selector,
}

impl RuntimeLabelStrategy {
    /// Compiles the label and container selectors from a profile.
    pub fn new(anchors: &AnchorIds) -> Result<Self, NmcError> {
        Ok(Self {
            label: markup::compile(&anchors.runtime_remaining)?,
            container: markup::compile(&anchors.data_field)?,
            value: markup::compile(&anchors.data_value)?,
        })
    }
}

impl ExtractionStrategy for RuntimeLabelStrategy {
    fn id(&self) -> &str {
        "nmc.runtime_label"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::LabeledValue
    }

    fn applies_to(&self, field: TelemetryField) -> bool {
        field == TelemetryField::RuntimeRemaining
    }

    fn extract(&self, doc: &Document, _field: TelemetryField) -> Option<f64> {
        let label = doc.select_first(&self.label)?;
        let container = markup::closest(label, &self.container)?;
        let value = container.select(&self.value).next()?;
        parse_duration(&markup::text_content(value))
    }
}

// ============================================================================
// Element Scan Strategy
// ============================================================================

/// Classifies every short element by keyword.
pub struct ElementScanStrategy {
    all: Selector,
}

impl ElementScanStrategy {
    /// Creates the strategy.
    pub fn new() -> Result<Self, NmcError> {
        Ok(Self {
            all: markup::compile("*")?,
        })
    }
}

impl ExtractionStrategy for ElementScanStrategy {
    fn id(&self) -> &str {
        "nmc.element_scan"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::ElementScan
    }

    fn extract(&self, doc: &Document, field: TelemetryField) -> Option<f64> {
        doc.select_all(&self.all)
            .map(|el| markup::text_content(el).to_lowercase())
            .filter(|text| (1..ELEMENT_TEXT_LIMIT).contains(&text.chars().count()))
            .find_map(|text| read_classified(&text, field))
    }
}

// ============================================================================
// Full Text Strategy
// ============================================================================

/// Looks for a number near a field keyword in the raw page source.
///
/// Works even when the markup is too broken to parse into a useful tree.
#[derive(Debug, Default)]
pub struct FullTextStrategy;

impl FullTextStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }

    /// Scans raw source text for `field`.
    pub fn scan(source: &str, field: TelemetryField) -> Option<f64> {
        let lower = source.to_lowercase();
        proximity_keywords(field).iter().find_map(|keyword| {
            let pos = lower.find(keyword)?;
            let window = window_around(&lower, pos, PROXIMITY_RADIUS);
            if field == TelemetryField::RuntimeRemaining {
                if let Some(minutes) = parse_duration_near(window) {
                    return Some(minutes);
                }
            }
            parse_number(window)
        })
    }
}

impl ExtractionStrategy for FullTextStrategy {
    fn id(&self) -> &str {
        "nmc.full_text"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::FullText
    }

    fn extract(&self, doc: &Document, field: TelemetryField) -> Option<f64> {
        Self::scan(doc.raw(), field)
    }
}

// ============================================================================
// Tests
// ============================================================================
