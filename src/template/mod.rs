//! Placeholder template engine.
//!
//! A single left-to-right pass substitutes `{{...}}` tokens against entity
//! metadata and the dialect descriptor. Resolution never raises: unknown or
//! malformed tokens stay verbatim in the output and are recorded in the
//! diagnostics, so the caller always gets the best text the pass could
//! produce. Resolved text is never re-scanned.

pub mod token;

mod resolve;

pub use resolve::KNOWN_TOKENS;
pub use token::TemplateToken;

use crate::diag::{DIAG_W002, DIAG_W005, Diagnostic};
use crate::dialect::Dialect;
use crate::meta::EntityMeta;
use crate::template::token::Piece;
use tracing::debug;

/// Everything a template pass resolves against.
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    pub dialect: Dialect,
    /// Entity metadata for column-dependent tokens.
    pub entity: Option<&'a EntityMeta>,
    /// Advisory list of bound parameter names; placeholders not in the list
    /// are flagged as warnings.
    pub bound_params: &'a [String],
}

impl<'a> TemplateContext<'a> {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            entity: None,
            bound_params: &[],
        }
    }

    pub fn with_entity(mut self, entity: &'a EntityMeta) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn with_bound_params(mut self, params: &'a [String]) -> Self {
        self.bound_params = params;
        self
    }
}

/// Output of a template pass. Check `warnings` and `errors` for soft-fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedTemplate {
    pub sql: String,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

impl ProcessedTemplate {
    /// True when the pass produced output without any recorded condition.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }
}

/// Process a raw template. Completes in bounded time: each token resolves
/// exactly once and resolved text is not re-scanned.
pub fn process_template(template: &str, ctx: &TemplateContext<'_>) -> ProcessedTemplate {
    let mut out = ProcessedTemplate::default();

    if template.is_empty() {
        out.warnings
            .push(Diagnostic::warning(DIAG_W005, "empty template"));
        return out;
    }

    let pieces = token::scan(template);
    debug!(
        dialect = ctx.dialect.descriptor().name,
        pieces = pieces.len(),
        "processing template"
    );

    for piece in pieces {
        match piece {
            Piece::Text(text) => out.sql.push_str(text),
            Piece::Malformed(raw) => {
                out.warnings.push(Diagnostic::warning(
                    DIAG_W002,
                    format!("malformed token '{raw}' left verbatim"),
                ));
                out.sql.push_str(raw);
            }
            Piece::Token(token, raw) => match resolve::resolve(&token, ctx, &mut out) {
                Some(resolved) => out.sql.push_str(&resolved),
                None => out.sql.push_str(raw),
            },
        }
    }
    out
}
