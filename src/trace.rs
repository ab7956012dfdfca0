//! Value tracing for mock loads.
//!
//! When several entries reach the same field (an override for a mock entry,
//! or a qualified and a promoted spelling of one embedded field) only one of
//! them is written. Tracing records every contender per field, in the order
//! they were applied, so tests can see which entry won.
//!
//! # Usage
//!
//! ```ignore
//! let loader = MockLoader::new([("Field1", Value::from("value1"))])
//!     .with_override("Config.Field1", "newvalue1");
//!
//! let trace = loader.load_traced(&mut config)?;
//! assert!(trace.was_overridden("Field1"));
//! println!("{}", trace.trace_report());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::SourceLocation;
use crate::resolve::FieldId;
use crate::value::{ConfigValue, Value};

/// A value with its source information.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedValue {
    /// The value supplied by this entry
    pub value: Value,
    /// Which layer and path spelling supplied it
    pub source: SourceLocation,
    /// Whether this value was written (not shadowed)
    pub is_final: bool,
}

impl TracedValue {
    /// Create a new traced value.
    pub fn new(value: Value, source: SourceLocation, is_final: bool) -> Self {
        Self {
            value,
            source,
            is_final,
        }
    }
}

/// Every entry that targeted one field.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTrace {
    /// Identity of the field
    pub field: FieldId,
    /// The entry that was written
    pub final_value: TracedValue,
    /// All entries, in application order (lowest precedence first)
    pub history: Vec<TracedValue>,
}

impl ValueTrace {
    /// Create a new value trace from a history of traced values.
    ///
    /// The last value in the history is considered the final value.
    pub fn new(field: FieldId, mut history: Vec<TracedValue>) -> Option<Self> {
        let last = history.last_mut()?;
        last.is_final = true;
        let final_value = last.clone();

        Some(Self {
            field,
            final_value,
            history,
        })
    }

    /// Check if this field was targeted by more than one entry.
    pub fn was_overridden(&self) -> bool {
        self.history.len() > 1
    }

    /// Get the number of entries that targeted this field.
    pub fn source_count(&self) -> usize {
        self.history.len()
    }

    /// Path spelling of the winning entry.
    pub fn path(&self) -> &str {
        &self.final_value.source.path
    }

    fn mentions(&self, path: &str) -> bool {
        self.history.iter().any(|v| v.source.path == path)
    }
}

impl fmt::Display for ValueTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Final: {} (from {})",
            self.final_value.value, self.final_value.source
        )?;

        if self.history.len() > 1 {
            writeln!(f, "History:")?;
            for val in &self.history {
                let marker = if val.is_final { "→" } else { " " };
                writeln!(f, "  {} [{}] {}", marker, val.source, val.value)?;
            }
        }

        Ok(())
    }
}

/// Result of `MockLoader::load_traced`: one trace per written field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadTrace {
    traces: BTreeMap<FieldId, ValueTrace>,
}

impl LoadTrace {
    /// Create a load trace from per-field traces.
    pub fn new(traces: BTreeMap<FieldId, ValueTrace>) -> Self {
        Self { traces }
    }

    /// Trace of the field that `path` was registered against.
    ///
    /// Any spelling that appeared in either layer finds the field, including
    /// spellings that lost to an override.
    pub fn trace(&self, path: &str) -> Option<&ValueTrace> {
        self.traces.values().find(|t| t.mentions(path))
    }

    /// Trace of a field by identity.
    pub fn trace_field(&self, field: &FieldId) -> Option<&ValueTrace> {
        self.traces.get(field)
    }

    /// Check if the field `path` was registered against had competing entries.
    pub fn was_overridden(&self, path: &str) -> bool {
        self.trace(path).map(|t| t.was_overridden()).unwrap_or(false)
    }

    /// Get all traces, ordered by field identity.
    pub fn traces(&self) -> impl Iterator<Item = &ValueTrace> {
        self.traces.values()
    }

    /// Winning path spellings of fields that had competing entries.
    pub fn overridden_paths(&self) -> impl Iterator<Item = &str> {
        self.traces
            .values()
            .filter(|t| t.was_overridden())
            .map(|t| t.path())
    }

    /// Get the number of written fields.
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    /// Generate a human-readable trace report.
    pub fn trace_report(&self) -> String {
        let mut report = String::new();

        for trace in self.traces.values() {
            report.push_str(&format!("{} = {}\n", trace.path(), trace.final_value.value));

            for val in &trace.history {
                let marker = if val.is_final { "✓" } else { "○" };
                let override_note = if !val.is_final { " <- overridden" } else { "" };
                report.push_str(&format!(
                    "  {} [{}] {}{}\n",
                    marker, val.source, val.value, override_note
                ));
            }
            report.push('\n');
        }

        report
    }
}

/// Collects entries per field while a load is planned.
#[derive(Debug, Default)]
pub struct TraceBuilder {
    values: BTreeMap<FieldId, Vec<TracedValue>>,
}

impl TraceBuilder {
    /// Create a new trace builder.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Record an entry for `field`. Returns the entries it shadows.
    pub fn add_value(&mut self, field: FieldId, value: &ConfigValue) -> &[TracedValue] {
        let history = self.values.entry(field).or_default();
        history.push(TracedValue::new(
            value.value.clone(),
            value.source.clone(),
            false,
        ));
        &history[..history.len() - 1]
    }

    /// Build the final per-field traces.
    pub fn build(self) -> LoadTrace {
        LoadTrace::new(
            self.values
                .into_iter()
                .filter_map(|(field, history)| {
                    ValueTrace::new(field.clone(), history).map(|trace| (field, trace))
                })
                .collect(),
        )
    }
}
