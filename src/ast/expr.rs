use crate::ast::{AggregateFunc, BinaryOp, UnaryOp, Value};
use serde::{Deserialize, Serialize};

/// A node in the expression tree.
///
/// Pure value tree: no cycles, no back references. Nodes are produced by the
/// builder functions in [`crate::ast::builders`] or the combinator methods
/// below and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Typed constant.
    Value(Value),
    /// Bound outer value with a caller-chosen parameter name.
    Param { name: String, value: Value },
    /// Column (member) access; the name is cased and quoted on render.
    Column(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Method call with an optional receiver, resolved through a fixed
    /// dispatch table at render time.
    Method {
        receiver: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
    },
    /// CASE WHEN test THEN then ELSE otherwise END
    Case {
        test: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Aggregate call; `COUNT(*)` when no per-row expression is given.
    Aggregate {
        func: AggregateFunc,
        expr: Option<Box<Expr>>,
    },
    /// COALESCE(left, right)
    Coalesce {
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// Whether the root of this tree is an OR. Drives the only
    /// parenthesization the WHERE joiner adds.
    pub fn is_or_rooted(&self) -> bool {
        matches!(
            self,
            Expr::Binary {
                op: BinaryOp::Or,
                ..
            }
        )
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn method(self, name: &str, args: Vec<Expr>) -> Expr {
        Expr::Method {
            receiver: Some(Box::new(self)),
            name: name.to_string(),
            args,
        }
    }

    // ── Comparisons ─────────────────────────────────────────────────

    pub fn eq(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Eq, self, rhs.into())
    }

    pub fn ne(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Ne, self, rhs.into())
    }

    pub fn gt(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Gt, self, rhs.into())
    }

    pub fn gte(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Gte, self, rhs.into())
    }

    pub fn lt(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Lt, self, rhs.into())
    }

    pub fn lte(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Lte, self, rhs.into())
    }

    // ── Boolean logic ───────────────────────────────────────────────

    pub fn and(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::And, self, rhs)
    }

    pub fn or(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Or, self, rhs)
    }

    pub fn not(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }

    pub fn neg(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(self),
        }
    }

    // ── Arithmetic / concatenation ──────────────────────────────────

    pub fn add(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Add, self, rhs.into())
    }

    pub fn sub(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Sub, self, rhs.into())
    }

    pub fn mul(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Mul, self, rhs.into())
    }

    pub fn div(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Div, self, rhs.into())
    }

    pub fn rem(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Rem, self, rhs.into())
    }

    pub fn concat(self, rhs: impl Into<Expr>) -> Expr {
        Expr::binary(BinaryOp::Concat, self, rhs.into())
    }

    // ── String methods ──────────────────────────────────────────────

    pub fn contains(self, needle: impl Into<Expr>) -> Expr {
        self.method("contains", vec![needle.into()])
    }

    pub fn starts_with(self, prefix: impl Into<Expr>) -> Expr {
        self.method("starts_with", vec![prefix.into()])
    }

    pub fn ends_with(self, suffix: impl Into<Expr>) -> Expr {
        self.method("ends_with", vec![suffix.into()])
    }

    pub fn to_upper(self) -> Expr {
        self.method("to_upper", vec![])
    }

    pub fn to_lower(self) -> Expr {
        self.method("to_lower", vec![])
    }

    pub fn length(self) -> Expr {
        self.method("length", vec![])
    }

    pub fn substring(self, start: impl Into<Expr>, len: Option<Expr>) -> Expr {
        let mut args = vec![start.into()];
        if let Some(l) = len {
            args.push(l);
        }
        self.method("substring", args)
    }

    pub fn replace(self, from: impl Into<Expr>, to: impl Into<Expr>) -> Expr {
        self.method("replace", vec![from.into(), to.into()])
    }

    // ── Math methods ────────────────────────────────────────────────

    pub fn abs(self) -> Expr {
        self.method("abs", vec![])
    }

    pub fn round(self) -> Expr {
        self.method("round", vec![])
    }

    pub fn floor(self) -> Expr {
        self.method("floor", vec![])
    }

    pub fn ceiling(self) -> Expr {
        self.method("ceiling", vec![])
    }

    pub fn sqrt(self) -> Expr {
        self.method("sqrt", vec![])
    }

    pub fn power(self, exponent: impl Into<Expr>) -> Expr {
        self.method("power", vec![exponent.into()])
    }

    // ── Membership / null handling ──────────────────────────────────

    /// `self IN (v1, v2, ...)`
    pub fn in_list<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Expr {
        let args = values
            .into_iter()
            .map(|v| Expr::Value(v.into()))
            .collect();
        self.method("in", args)
    }

    /// `self >= low AND self <= high`
    pub fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        self.clone().gte(low).and(self.lte(high))
    }

    pub fn coalesce(self, fallback: impl Into<Expr>) -> Expr {
        Expr::Coalesce {
            left: Box::new(self),
            right: Box::new(fallback.into()),
        }
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Expr::Value(v)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::Value(Value::Int(n as i64))
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::Value(Value::Int(n))
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::Value(Value::Float(n))
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Value(Value::Text(s.to_string()))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Value(Value::Bool(b))
    }
}
