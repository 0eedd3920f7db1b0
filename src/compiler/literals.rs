//! Type-driven constant rendering.

use crate::ast::Value;
use crate::dialect::DialectDescriptor;

/// Render a constant as a dialect literal.
///
/// Strings quote with the dialect pair and double embedded quotes; booleans
/// and dates follow the descriptor; numerics render culture-invariant at
/// full precision.
pub fn literal(value: &Value, descriptor: &DialectDescriptor) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => descriptor.bool_literal(*b).to_string(),
        Value::Int(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::Text(s) => descriptor.quote_string(s),
        Value::DateTime(ts) => descriptor.date_literal(ts),
        Value::Uuid(u) => descriptor.quote_string(&u.to_string()),
    }
}
