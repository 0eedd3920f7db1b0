//! Predicate/expression compiler.
//!
//! Recursive AST-to-text translation, parameterized by a dialect
//! descriptor. Side effects are limited to the parameter sink and the
//! diagnostics collection; the input tree is never mutated.

mod literals;
mod methods;
mod params;

pub use literals::literal;
pub use params::{ParamMode, ParamSink};

use crate::ast::{BinaryOp, Expr, UnaryOp, Value};
use crate::casing::to_snake_case;
use crate::diag::Diagnostic;
use crate::dialect::{ConcatStyle, DialectDescriptor};

/// One compilation pass over expression trees for a single statement.
pub struct ExprCompiler<'a> {
    descriptor: &'a DialectDescriptor,
    sink: ParamSink,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ExprCompiler<'a> {
    /// Compiler that renders constants in place.
    pub fn inline(descriptor: &'a DialectDescriptor) -> Self {
        Self {
            descriptor,
            sink: ParamSink::inline(),
            diagnostics: Vec::new(),
        }
    }

    /// Compiler that collects constants and bound parameters.
    pub fn collecting(descriptor: &'a DialectDescriptor) -> Self {
        Self {
            descriptor,
            sink: ParamSink::collecting(),
            diagnostics: Vec::new(),
        }
    }

    pub fn descriptor(&self) -> &'a DialectDescriptor {
        self.descriptor
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn sink_is_inline(&self) -> bool {
        self.sink.is_inline()
    }

    /// Consume the compiler, yielding collected parameters and diagnostics.
    pub fn into_parts(self) -> (Vec<(String, Value)>, Vec<Diagnostic>) {
        (self.sink.into_entries(), self.diagnostics)
    }

    /// Render one expression tree as a dialect SQL fragment.
    pub fn render(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Value(v) => self.render_constant(v),
            Expr::Param { name, value } => self.render_param(name, value),
            Expr::Column(name) => self.render_column(name),
            Expr::Unary { op, operand } => self.render_unary(*op, operand),
            Expr::Binary { op, left, right } => self.render_binary(*op, left, right),
            Expr::Method {
                receiver,
                name,
                args,
            } => self.render_method(receiver.as_deref(), name, args),
            Expr::Case {
                test,
                then,
                otherwise,
            } => {
                let test = self.render(test);
                let then = self.render(then);
                let otherwise = self.render(otherwise);
                format!("CASE WHEN {test} THEN {then} ELSE {otherwise} END")
            }
            Expr::Aggregate { func, expr } => match expr {
                None => "COUNT(*)".to_string(),
                Some(inner) => {
                    let inner = self.render(inner);
                    format!("{func}({inner})")
                }
            },
            Expr::Coalesce { left, right } => {
                let left = self.render(left);
                let right = self.render(right);
                format!("COALESCE({left}, {right})")
            }
        }
    }

    /// Render a WHERE entry list: AND-joined, left-to-right, each entry
    /// parenthesized only when its own root is an OR.
    pub fn render_predicates(&mut self, predicates: &[Expr]) -> String {
        predicates
            .iter()
            .map(|p| {
                let sql = self.render(p);
                if p.is_or_rooted() {
                    format!("({sql})")
                } else {
                    sql
                }
            })
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    fn render_column(&self, name: &str) -> String {
        self.descriptor.quote_identifier(&to_snake_case(name))
    }

    fn render_constant(&mut self, value: &Value) -> String {
        if self.sink.is_inline() || !value.is_bindable() {
            return literal(value, self.descriptor);
        }
        let name = self.sink.auto_name();
        self.sink.push(name.clone(), value.clone());
        self.descriptor.placeholder(&name)
    }

    fn render_param(&mut self, name: &str, value: &Value) -> String {
        if self.sink.is_inline() {
            return literal(value, self.descriptor);
        }
        // A caller-supplied name may carry a host sigil (@Id, :Id); strip it
        // and re-case so the dialect prefix is the only sigil in the output.
        let bare = name.trim_start_matches(|c: char| !c.is_ascii_alphanumeric());
        let cased = to_snake_case(bare);
        self.sink.push(cased.clone(), value.clone());
        self.descriptor.placeholder(&cased)
    }

    fn render_unary(&mut self, op: UnaryOp, operand: &Expr) -> String {
        let inner = self.render(operand);
        match op {
            UnaryOp::Not => {
                if matches!(operand, Expr::Binary { .. } | Expr::Method { .. }) {
                    format!("NOT ({inner})")
                } else {
                    format!("NOT {inner}")
                }
            }
            UnaryOp::Neg => {
                if matches!(operand, Expr::Binary { .. }) {
                    format!("-({inner})")
                } else {
                    format!("-{inner}")
                }
            }
        }
    }

    fn render_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> String {
        if op == BinaryOp::Concat {
            // Function-call concatenation needs no grouping; the infix
            // styles keep the tree shape with parens like arithmetic does.
            let wrap = self.descriptor.concat != ConcatStyle::ConcatCall;
            let parts = vec![
                self.render_concat_part(left, wrap),
                self.render_concat_part(right, wrap),
            ];
            return self.descriptor.concat(&parts);
        }
        let l = self.render_operand(left, op);
        let r = self.render_operand(right, op);
        format!("{l} {} {r}", op.sql_symbol())
    }

    fn render_concat_part(&mut self, operand: &Expr, wrap: bool) -> String {
        let sql = self.render(operand);
        let nested = matches!(
            operand,
            Expr::Binary { op, .. } if op.is_arithmetic() || *op == BinaryOp::Concat
        );
        if wrap && nested {
            format!("({sql})")
        } else {
            sql
        }
    }

    /// Render a binary operand, parenthesizing only where the flat text
    /// would re-associate the tree.
    fn render_operand(&mut self, operand: &Expr, parent: BinaryOp) -> String {
        let sql = self.render(operand);
        let needs_parens = match operand {
            Expr::Binary { op: child, .. } => {
                if parent.is_arithmetic() {
                    // (a - b) - c and a - (b - c) differ; keep the shape.
                    child.is_arithmetic() || *child == BinaryOp::Concat
                } else if parent == BinaryOp::And {
                    *child == BinaryOp::Or
                } else {
                    // OR parents and comparisons: AND binds tighter, and
                    // arithmetic under a comparison needs no grouping.
                    false
                }
            }
            _ => false,
        };
        if needs_parens { format!("({sql})") } else { sql }
    }
}
