//! Ordered parameter collection.

use crate::ast::Value;

/// Whether constants render in place or collect into the parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    /// Constants render as dialect literals.
    Inline,
    /// Constants and bound parameters collect as (name, value) pairs in
    /// first-encounter order.
    Collect,
}

/// Ordered (name, value) parameter collector.
///
/// Re-binding the same logical value twice records two entries; the list
/// order matches placeholder occurrence order in the SQL text exactly.
#[derive(Debug, Clone)]
pub struct ParamSink {
    mode: ParamMode,
    entries: Vec<(String, Value)>,
}

impl ParamSink {
    pub fn inline() -> Self {
        Self {
            mode: ParamMode::Inline,
            entries: Vec::new(),
        }
    }

    pub fn collecting() -> Self {
        Self {
            mode: ParamMode::Collect,
            entries: Vec::new(),
        }
    }

    pub fn is_inline(&self) -> bool {
        self.mode == ParamMode::Inline
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    /// Generated name for an anonymous constant parameter.
    pub fn auto_name(&self) -> String {
        format!("p{}", self.entries.len())
    }

    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }
}
