//! Error types for sqlforge.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForgeError {
    /// Dialect name not in the registry.
    #[error("Unsupported dialect: '{0}'. Expected: sqlserver, mysql, postgres, oracle, db2, or sqlite")]
    UnsupportedDialect(String),

    /// Input contract violation (empty identifier, bad argument).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// DELETE with no WHERE predicate. Intentional guardrail against
    /// rendering an unconditional delete by omission.
    #[error("Refusing to render DELETE on '{table}' without a WHERE predicate")]
    MissingWhereGuard { table: String },

    /// INSERT row does not match the arity fixed by the first row.
    #[error("Row arity mismatch: first row has {expected} values, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// Builder used after `dispose()`.
    #[error("Query builder has been disposed")]
    Disposed,
}

impl ForgeError {
    /// Create an invalid-argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a missing-where guardrail error.
    pub fn missing_where(table: impl Into<String>) -> Self {
        Self::MissingWhereGuard {
            table: table.into(),
        }
    }
}

/// Result type alias for sqlforge operations.
pub type ForgeResult<T> = Result<T, ForgeError>;
