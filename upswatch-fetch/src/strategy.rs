//! Extraction strategy trait and types.
//!
//! A strategy represents one structural assumption about the status page
//! (a known element id, a table row, free text near a keyword). Strategies
//! are tried in priority order, independently for each telemetry field.

use serde::{Deserialize, Serialize};
use std::fmt;
use upswatch_core::TelemetryField;

use crate::markup::Document;

// ============================================================================
// Strategy Kind
// ============================================================================

/// The structural assumption a strategy relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// A known anchor element located by id.
    Selector,
    /// Keyword classification of table rows.
    Tabular,
    /// A labeled value container located by id.
    LabeledValue,
    /// Keyword classification of every short element.
    ElementScan,
    /// Keyword proximity in the raw page source.
    FullText,
}

impl StrategyKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Selector => "Selector",
            Self::Tabular => "Table Scan",
            Self::LabeledValue => "Labeled Value",
            Self::ElementScan => "Element Scan",
            Self::FullText => "Full Text",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Extraction Strategy Trait
// ============================================================================

/// One deterministic attempt to recover a telemetry value from a page.
///
/// Implementations must be pure: the same document and field always yield
/// the same answer, and a missing element or unparseable text is `None`,
/// never a panic.
///
/// ```ignore
/// struct FixedAnchor(Selector);
///
/// impl ExtractionStrategy for FixedAnchor {
///     fn id(&self) -> &str { "nmc.selector" }
///     fn kind(&self) -> StrategyKind { StrategyKind::Selector }
///     fn extract(&self, doc: &Document, field: TelemetryField) -> Option<f64> {
///         let el = doc.select_first(&self.0)?;
///         parse_number(&text_content(el))
///     }
/// }
/// ```
pub trait ExtractionStrategy {
    /// Unique identifier for this strategy (e.g., "nmc.selector").
    fn id(&self) -> &str;

    /// The kind of structural assumption this strategy uses.
    fn kind(&self) -> StrategyKind;

    /// Whether this strategy can produce the given field at all.
    fn applies_to(&self, _field: TelemetryField) -> bool {
        true
    }

    /// Attempts to recover `field` from the document.
    fn extract(&self, doc: &Document, field: TelemetryField) -> Option<f64>;

    /// Priority of this strategy (higher = try first).
    ///
    /// Default priorities follow decreasing structural specificity:
    /// - Selector: 100
    /// - Tabular: 80
    /// - Labeled value: 60
    /// - Element scan: 40
    /// - Full text: 20
    fn priority(&self) -> u32 {
        match self.kind() {
            StrategyKind::Selector => 100,
            StrategyKind::Tabular => 80,
            StrategyKind::LabeledValue => 60,
            StrategyKind::ElementScan => 40,
            StrategyKind::FullText => 20,
        }
    }
}

// ============================================================================
// Strategy Info
// ============================================================================

/// Information about a strategy (for reporting).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Strategy ID.
    pub id: String,
    /// Strategy kind.
    pub kind: StrategyKind,
    /// Priority.
    pub priority: u32,
}

impl StrategyInfo {
    /// Creates strategy info from a strategy implementation.
    pub fn from_strategy(strategy: &dyn ExtractionStrategy) -> Self {
        Self {
            id: strategy.id().to_string(),
            kind: strategy.kind(),
            priority: strategy.priority(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
