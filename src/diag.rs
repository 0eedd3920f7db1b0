//! Soft-fail diagnostics.
//!
//! Rendering and template processing degrade gracefully: recoverable
//! conditions are collected here instead of aborting the pass. Callers
//! inspect the collection on the returned output to detect them.

use serde::{Deserialize, Serialize};

// ── Diagnostic codes ────────────────────────────────────────────────
// Centralised constants to avoid magic strings scattered across the codebase.

/// Unknown template token, left verbatim.
pub const DIAG_W001: &str = "W001";
/// Malformed or unterminated template token, left verbatim.
pub const DIAG_W002: &str = "W002";
/// Column or parameter did not resolve against the entity metadata.
pub const DIAG_W003: &str = "W003";
/// Unknown method in an expression, rendered as NULL.
pub const DIAG_W004: &str = "W004";
/// Empty input template.
pub const DIAG_W005: &str = "W005";
/// Token missing a required argument, left verbatim.
pub const DIAG_W006: &str = "W006";
/// Paging feature the dialect cannot express was dropped.
pub const DIAG_W007: &str = "W007";
/// Entity metadata required but absent; token produced no output.
pub const DIAG_E001: &str = "E001";

/// Severity of a collected diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Output degraded but usable.
    Warning,
    /// Output is missing a requested piece.
    Error,
}

/// A single soft-fail condition recorded during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{} [{}]: {}", level, self.code, self.message)
    }
}
