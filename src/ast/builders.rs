//! Expression builders.
//!
//! Free functions for the leaves; combinator methods on [`Expr`] grow the
//! tree from there.
//!
//! ```
//! use sqlforge::ast::builders::{col, val};
//! let predicate = col("Age").gt(18).and(col("Name").contains(val("an")));
//! ```

use crate::ast::{AggregateFunc, Expr, Value};

/// Column (member access) expression.
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Typed constant expression.
pub fn val(value: impl Into<Value>) -> Expr {
    Expr::Value(value.into())
}

/// NULL constant.
pub fn null() -> Expr {
    Expr::Value(Value::Null)
}

/// Named bound parameter carrying its outer value.
pub fn param(name: impl Into<String>, value: impl Into<Value>) -> Expr {
    Expr::Param {
        name: name.into(),
        value: value.into(),
    }
}

/// CASE WHEN test THEN then ELSE otherwise END
pub fn case_when(test: Expr, then: impl Into<Expr>, otherwise: impl Into<Expr>) -> Expr {
    Expr::Case {
        test: Box::new(test),
        then: Box::new(then.into()),
        otherwise: Box::new(otherwise.into()),
    }
}

/// COUNT(*)
pub fn count_star() -> Expr {
    Expr::Aggregate {
        func: AggregateFunc::Count,
        expr: None,
    }
}

fn aggregate(func: AggregateFunc, expr: Expr) -> Expr {
    Expr::Aggregate {
        func,
        expr: Some(Box::new(expr)),
    }
}

/// COUNT(expr)
pub fn count(expr: Expr) -> Expr {
    aggregate(AggregateFunc::Count, expr)
}

/// SUM(expr)
pub fn sum(expr: Expr) -> Expr {
    aggregate(AggregateFunc::Sum, expr)
}

/// AVG(expr)
pub fn avg(expr: Expr) -> Expr {
    aggregate(AggregateFunc::Avg, expr)
}

/// MAX(expr)
pub fn max(expr: Expr) -> Expr {
    aggregate(AggregateFunc::Max, expr)
}

/// MIN(expr)
pub fn min(expr: Expr) -> Expr {
    aggregate(AggregateFunc::Min, expr)
}

/// Fold predicates into a single left-to-right AND chain.
/// Returns `None` for an empty input.
pub fn and_all(predicates: impl IntoIterator<Item = Expr>) -> Option<Expr> {
    predicates.into_iter().reduce(|acc, p| acc.and(p))
}
