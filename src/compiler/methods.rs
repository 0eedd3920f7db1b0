//! Method-call dispatch.
//!
//! A fixed table maps logical method names onto dialect SQL. Anything
//! outside the table renders as a NULL literal and records a warning, so a
//! single unsupported call degrades one fragment instead of aborting the
//! whole statement.

use crate::ast::{Expr, Value};
use crate::compiler::ExprCompiler;
use crate::diag::{DIAG_W004, Diagnostic};

/// Dispatchable method names, for validation and suggestions.
pub const KNOWN_METHODS: &[&str] = &[
    "contains",
    "starts_with",
    "ends_with",
    "to_upper",
    "to_lower",
    "length",
    "substring",
    "replace",
    "abs",
    "round",
    "floor",
    "ceiling",
    "sqrt",
    "power",
    "greatest",
    "least",
    "in",
];

impl ExprCompiler<'_> {
    pub(crate) fn render_method(
        &mut self,
        receiver: Option<&Expr>,
        name: &str,
        args: &[Expr],
    ) -> String {
        let f = self.descriptor().functions;
        match name {
            "contains" => self.render_like(receiver, args.first(), true, true),
            "starts_with" => self.render_like(receiver, args.first(), false, true),
            "ends_with" => self.render_like(receiver, args.first(), true, false),
            "to_upper" => self.render_call(f.upper, receiver, args),
            "to_lower" => self.render_call(f.lower, receiver, args),
            "length" => self.render_call(f.length, receiver, args),
            "substring" => self.render_call(f.substring, receiver, args),
            "replace" => self.render_call(f.replace, receiver, args),
            "abs" => self.render_call(f.abs, receiver, args),
            "round" => self.render_call(f.round, receiver, args),
            "floor" => self.render_call(f.floor, receiver, args),
            "ceiling" => self.render_call(f.ceiling, receiver, args),
            "sqrt" => self.render_call(f.sqrt, receiver, args),
            "power" => self.render_call(f.power, receiver, args),
            "greatest" => self.render_call(f.greatest, receiver, args),
            "least" => self.render_call(f.least, receiver, args),
            "in" => self.render_in(receiver, args),
            unknown => {
                let mut message = format!("unknown method '{unknown}' rendered as NULL");
                if let Some(candidate) = suggest(unknown) {
                    message.push_str(&format!("; did you mean '{candidate}'?"));
                }
                self.push_diagnostic(Diagnostic::warning(DIAG_W004, message));
                "NULL".to_string()
            }
        }
    }

    /// `FN(receiver, args...)`
    fn render_call(&mut self, function: &str, receiver: Option<&Expr>, args: &[Expr]) -> String {
        let mut operands = Vec::with_capacity(args.len() + 1);
        if let Some(r) = receiver {
            operands.push(self.render(r));
        }
        for arg in args {
            operands.push(self.render(arg));
        }
        format!("{function}({})", operands.join(", "))
    }

    /// `receiver LIKE '%needle%'` with the wildcard placement given.
    ///
    /// An inline string constant embeds into a single pattern literal;
    /// anything else goes through the dialect's concatenation style, so a
    /// bound parameter still works: `name LIKE '%' || ? || '%'`.
    fn render_like(
        &mut self,
        receiver: Option<&Expr>,
        needle: Option<&Expr>,
        pct_before: bool,
        pct_after: bool,
    ) -> String {
        let recv = match receiver {
            Some(r) => self.render(r),
            None => "NULL".to_string(),
        };
        let Some(needle) = needle else {
            return format!("{recv} LIKE {}", self.descriptor().quote_string("%"));
        };

        if self.is_inline_text(needle) {
            if let Expr::Value(Value::Text(s)) = needle {
                let pattern = format!(
                    "{}{s}{}",
                    if pct_before { "%" } else { "" },
                    if pct_after { "%" } else { "" }
                );
                return format!("{recv} LIKE {}", self.descriptor().quote_string(&pattern));
            }
        }

        let mut parts = Vec::with_capacity(3);
        if pct_before {
            parts.push(self.descriptor().quote_string("%"));
        }
        parts.push(self.render(needle));
        if pct_after {
            parts.push(self.descriptor().quote_string("%"));
        }
        format!("{recv} LIKE {}", self.descriptor().concat(&parts))
    }

    fn is_inline_text(&self, expr: &Expr) -> bool {
        matches!(expr, Expr::Value(Value::Text(_))) && self.sink_is_inline()
    }

    /// `receiver IN (v1, v2, ...)`
    fn render_in(&mut self, receiver: Option<&Expr>, args: &[Expr]) -> String {
        let recv = match receiver {
            Some(r) => self.render(r),
            None => "NULL".to_string(),
        };
        if args.is_empty() {
            // An empty IN list can never match.
            return "1 = 0".to_string();
        }
        let rendered: Vec<String> = args.iter().map(|a| self.render(a)).collect();
        format!("{recv} IN ({})", rendered.join(", "))
    }
}

fn suggest(unknown: &str) -> Option<&'static str> {
    KNOWN_METHODS
        .iter()
        .map(|m| (strsim::levenshtein(unknown, m), *m))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, m)| m)
}
