//! Extraction pipeline for applying strategies in order.
//!
//! The pipeline takes a list of extraction strategies and, for each
//! telemetry field independently, tries them in priority order until one
//! recovers a value.

use std::time::{Duration, Instant};
use tracing::{debug, instrument, trace};
use upswatch_core::TelemetryField;

use crate::markup::Document;
use crate::strategy::{ExtractionStrategy, StrategyInfo, StrategyKind};

// ============================================================================
// Field Attempt
// ============================================================================

/// Record of a single (field, strategy) attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAttempt {
    /// The field being extracted.
    pub field: TelemetryField,
    /// The strategy ID that was attempted.
    pub strategy_id: String,
    /// The kind of strategy used.
    pub kind: StrategyKind,
    /// The recovered value, if any.
    pub value: Option<f64>,
}

impl FieldAttempt {
    /// Returns true if the attempt recovered a value.
    pub fn succeeded(&self) -> bool {
        self.value.is_some()
    }
}

// ============================================================================
// Extraction Outcome
// ============================================================================

/// The outcome of running the pipeline over one document.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    values: [Option<f64>; 4],
    resolved_by: [Option<String>; 4],
    /// All attempts made, in order.
    pub attempts: Vec<FieldAttempt>,
    /// Total duration of the run.
    pub duration: Duration,
}

impl ExtractionOutcome {
    /// Returns the recovered value for a field, if any strategy found one.
    pub fn value(&self, field: TelemetryField) -> Option<f64> {
        self.values[field.index()]
    }

    /// Returns the recovered value, or `0` if the field was not found.
    pub fn value_or_default(&self, field: TelemetryField) -> f64 {
        self.value(field).unwrap_or(0.0)
    }

    /// Returns the ID of the strategy that resolved a field.
    pub fn resolved_by(&self, field: TelemetryField) -> Option<&str> {
        self.resolved_by[field.index()].as_deref()
    }

    /// Returns true if the field was resolved.
    pub fn is_resolved(&self, field: TelemetryField) -> bool {
        self.value(field).is_some()
    }

    /// Returns the fields no strategy could resolve.
    pub fn unresolved(&self) -> Vec<TelemetryField> {
        TelemetryField::ALL
            .into_iter()
            .filter(|f| !self.is_resolved(*f))
            .collect()
    }

    /// Returns the number of attempts made.
    pub fn attempts_count(&self) -> usize {
        self.attempts.len()
    }
}

// ============================================================================
// Extraction Pipeline
// ============================================================================

/// A pipeline of extraction strategies tried in order.
pub struct ExtractionPipeline {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ExtractionPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Creates a pipeline with the given strategies.
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        let mut pipeline = Self { strategies };
        pipeline.sort_by_priority();
        pipeline
    }

    /// Sorts strategies by priority (highest first). Ties keep insertion order.
    fn sort_by_priority(&mut self) {
        self.strategies.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Returns the number of strategies in the pipeline.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Returns information about all strategies, in execution order.
    pub fn strategy_info(&self) -> Vec<StrategyInfo> {
        self.strategies
            .iter()
            .map(|s| StrategyInfo::from_strategy(s.as_ref()))
            .collect()
    }

    /// Runs every field through the strategy chain.
    #[instrument(skip(self, doc), fields(strategies = self.strategies.len()))]
    pub fn execute(&self, doc: &Document) -> ExtractionOutcome {
        let start = Instant::now();
        let mut values = [None; 4];
        let mut resolved_by: [Option<String>; 4] = Default::default();
        let mut attempts = Vec::new();

        for field in TelemetryField::ALL {
            for strategy in &self.strategies {
                if !strategy.applies_to(field) {
                    continue;
                }

                let value = strategy.extract(doc, field);
                trace!(field = %field, strategy = %strategy.id(), ?value, "Strategy attempted");
                attempts.push(FieldAttempt {
                    field,
                    strategy_id: strategy.id().to_string(),
                    kind: strategy.kind(),
                    value,
                });

                if let Some(v) = value {
                    debug!(field = %field, strategy = %strategy.id(), value = v, "Field resolved");
                    values[field.index()] = Some(v);
                    resolved_by[field.index()] = Some(strategy.id().to_string());
                    break;
                }
            }

            if values[field.index()].is_none() {
                debug!(field = %field, "No strategy resolved field");
            }
        }

        ExtractionOutcome {
            values,
            resolved_by,
            attempts,
            duration: start.elapsed(),
        }
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
