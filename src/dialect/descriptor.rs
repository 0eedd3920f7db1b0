//! Dialect descriptors: pure per-engine syntax data.
//!
//! Every piece of dialect variance lives here. The compiler and builder read
//! descriptor fields and never branch on the dialect tag itself; a new
//! difference between engines becomes a new descriptor field, not a special
//! case elsewhere.

use chrono::NaiveDateTime;

/// How parameters are referenced in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// Named placeholder with a prefix token (`@name`, `:name`).
    Named(&'static str),
    /// Positional `?` placeholders in argument order.
    Positional,
}

/// How a page of rows is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingStyle {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    OffsetFetch,
    /// `FETCH FIRST n ROWS ONLY` suffix; no offset support.
    FetchFirst,
}

/// How date/time constants are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// Quoted ISO literal: `'2024-01-31 12:00:00'`
    QuotedIso,
    /// `TO_DATE('2024-01-31 12:00:00', 'YYYY-MM-DD HH24:MI:SS')`
    ToDate,
}

/// How strings are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatStyle {
    /// `a + b`
    InfixPlus,
    /// `CONCAT(a, b, ...)`
    ConcatCall,
    /// `a || b`
    InfixPipe,
}

/// Logical function name to dialect token mapping.
///
/// Covered set: the math/string functions the expression compiler dispatches
/// through. One field per logical name keeps the lookup total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionTable {
    pub abs: &'static str,
    pub round: &'static str,
    pub floor: &'static str,
    pub ceiling: &'static str,
    pub sqrt: &'static str,
    pub power: &'static str,
    pub greatest: &'static str,
    pub least: &'static str,
    pub length: &'static str,
    pub substring: &'static str,
    pub replace: &'static str,
    pub upper: &'static str,
    pub lower: &'static str,
    pub concat: &'static str,
}

/// Immutable syntax description of one SQL engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectDescriptor {
    pub name: &'static str,
    /// Identifier quote pair, e.g. `[` `]` or `"` `"`.
    pub ident_quote: (&'static str, &'static str),
    /// String literal quote character.
    pub string_quote: char,
    pub param: ParamStyle,
    pub paging: PagingStyle,
    /// (true, false) literal pair.
    pub bools: (&'static str, &'static str),
    pub date: DateStyle,
    pub concat: ConcatStyle,
    pub functions: FunctionTable,
}

impl DialectDescriptor {
    /// Quote an identifier with the dialect pair, doubling any embedded
    /// closing quote. Dotted identifiers are quoted part by part.
    pub fn quote_identifier(&self, name: &str) -> String {
        if name.contains('.') {
            return name
                .split('.')
                .map(|part| self.quote_single(part))
                .collect::<Vec<_>>()
                .join(".");
        }
        self.quote_single(name)
    }

    fn quote_single(&self, name: &str) -> String {
        let (open, close) = self.ident_quote;
        let doubled = format!("{close}{close}");
        format!("{open}{}{close}", name.replace(close, &doubled))
    }

    /// Quote a string literal, doubling every embedded quote character.
    pub fn quote_string(&self, value: &str) -> String {
        let q = self.string_quote;
        let mut out = String::with_capacity(value.len() + 2);
        out.push(q);
        for ch in value.chars() {
            if ch == q {
                out.push(q);
            }
            out.push(ch);
        }
        out.push(q);
        out
    }

    /// Placeholder text for a named parameter.
    pub fn placeholder(&self, name: &str) -> String {
        match self.param {
            ParamStyle::Named(prefix) => format!("{prefix}{name}"),
            ParamStyle::Positional => "?".to_string(),
        }
    }

    pub fn bool_literal(&self, value: bool) -> &'static str {
        if value { self.bools.0 } else { self.bools.1 }
    }

    /// Render a date/time constant as a dialect literal.
    pub fn date_literal(&self, value: &NaiveDateTime) -> String {
        let iso = value.format("%Y-%m-%d %H:%M:%S");
        match self.date {
            DateStyle::QuotedIso => format!("{q}{iso}{q}", q = self.string_quote),
            DateStyle::ToDate => {
                format!("TO_DATE('{iso}', 'YYYY-MM-DD HH24:MI:SS')")
            }
        }
    }

    /// Concatenate already-rendered string fragments per dialect style.
    pub fn concat(&self, parts: &[String]) -> String {
        match self.concat {
            ConcatStyle::InfixPlus => parts.join(" + "),
            ConcatStyle::InfixPipe => parts.join(" || "),
            ConcatStyle::ConcatCall => format!("CONCAT({})", parts.join(", ")),
        }
    }

    /// Render the paging suffix. Counts are always inlined; most engines
    /// reject parameterized LIMIT/OFFSET.
    ///
    /// Returns the clause text plus whether a requested skip was dropped
    /// because the dialect cannot express it.
    pub fn paging(&self, skip: Option<i64>, take: Option<i64>) -> (String, bool) {
        let mut sql = String::new();
        match self.paging {
            PagingStyle::LimitOffset => {
                if let Some(n) = take {
                    sql.push_str(&format!(" LIMIT {n}"));
                }
                if let Some(n) = skip {
                    sql.push_str(&format!(" OFFSET {n}"));
                }
                (sql, false)
            }
            PagingStyle::OffsetFetch => {
                if skip.is_none() && take.is_none() {
                    return (sql, false);
                }
                sql.push_str(&format!(" OFFSET {} ROWS", skip.unwrap_or(0)));
                if let Some(n) = take {
                    sql.push_str(&format!(" FETCH NEXT {n} ROWS ONLY"));
                }
                (sql, false)
            }
            PagingStyle::FetchFirst => {
                if let Some(n) = take {
                    sql.push_str(&format!(" FETCH FIRST {n} ROWS ONLY"));
                }
                (sql, skip.is_some())
            }
        }
    }
}
