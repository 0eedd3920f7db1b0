//! Chainable query builder.
//!
//! A builder owns one [`ClauseSet`] and is owned by exactly one caller;
//! `&mut self` chaining enforces the single-owner contract at compile time.
//! Mutators accumulate clauses, terminal calls render them. Hard failures
//! detected inside a mutator (use-after-dispose, row arity) are latched and
//! surfaced by the next terminal call; terminal calls on a disposed builder
//! fail immediately with [`ForgeError::Disposed`].

mod render;

use crate::ast::{Expr, SortOrder, Value, builders::count_star};
use crate::compiler::ExprCompiler;
use crate::diag::Diagnostic;
use crate::dialect::Dialect;
use crate::error::{ForgeError, ForgeResult};
use serde::Serialize;
use tracing::debug;

/// A rendered statement plus its ordered parameters.
///
/// Parameter order matches placeholder occurrence order in `sql` exactly;
/// a value bound twice appears twice. Soft-fails during rendering are in
/// `warnings` - callers should check it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<(String, Value)>,
    pub warnings: Vec<Diagnostic>,
}

/// What kind of statement the accumulated clauses describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementKind {
    Select,
    Update,
    Insert,
    Delete,
}

/// The clauses accumulated by one builder.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClauseSet {
    pub filters: Vec<Expr>,
    pub sets: Vec<(String, Expr)>,
    pub group_by: Option<Expr>,
    pub having: Vec<Expr>,
    pub order_by: Vec<(Expr, SortOrder)>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
    pub projection: Option<Vec<Expr>>,
    pub insert: bool,
    pub insert_columns: Vec<String>,
    pub insert_rows: Vec<Vec<Expr>>,
    pub delete: bool,
}

impl ClauseSet {
    fn kind(&self) -> StatementKind {
        if self.delete {
            StatementKind::Delete
        } else if self.insert {
            StatementKind::Insert
        } else if !self.sets.is_empty() {
            StatementKind::Update
        } else {
            StatementKind::Select
        }
    }
}

/// Mutable, chainable accumulator of query clauses for one table.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    pub(crate) table: String,
    pub(crate) dialect: Dialect,
    pub(crate) clauses: ClauseSet,
    disposed: bool,
    latched: Option<ForgeError>,
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            table: table.into(),
            dialect,
            clauses: ClauseSet::default(),
            disposed: false,
            latched: None,
        }
    }

    /// False when the builder is disposed; also latches the error so the
    /// next terminal call reports the misuse.
    fn usable(&mut self) -> bool {
        if self.disposed {
            self.latched.get_or_insert(ForgeError::Disposed);
            return false;
        }
        true
    }

    // ── Filtering ───────────────────────────────────────────────────

    /// Append a WHERE predicate. Entries AND-combine in call order.
    /// `None` is a documented no-op, not an error.
    pub fn filter(&mut self, predicate: impl Into<Option<Expr>>) -> &mut Self {
        if self.usable()
            && let Some(p) = predicate.into()
        {
            self.clauses.filters.push(p);
        }
        self
    }

    /// Alias of [`filter`](Self::filter), kept for call-site ergonomics.
    pub fn and_filter(&mut self, predicate: impl Into<Option<Expr>>) -> &mut Self {
        self.filter(predicate)
    }

    // ── Ordering and paging ─────────────────────────────────────────

    pub fn order_by(&mut self, key: Expr, direction: SortOrder) -> &mut Self {
        if self.usable() {
            self.clauses.order_by.push((key, direction));
        }
        self
    }

    /// Rows to skip. Non-positive values render literally; no clamping.
    pub fn skip(&mut self, n: i64) -> &mut Self {
        if self.usable() {
            self.clauses.skip = Some(n);
        }
        self
    }

    /// Rows to take. Non-positive values render literally; no clamping.
    pub fn take(&mut self, n: i64) -> &mut Self {
        if self.usable() {
            self.clauses.take = Some(n);
        }
        self
    }

    // ── Projection and grouping ─────────────────────────────────────

    /// Replace the projection. Without a projection the statement selects `*`.
    pub fn select(&mut self, exprs: impl IntoIterator<Item = Expr>) -> &mut Self {
        if self.usable() {
            self.clauses.projection = Some(exprs.into_iter().collect());
        }
        self
    }

    /// Project plain columns by name.
    pub fn select_columns(&mut self, columns: &[&str]) -> &mut Self {
        let exprs: Vec<Expr> = columns.iter().map(|c| Expr::Column(c.to_string())).collect();
        self.select(exprs)
    }

    /// Project `COUNT(*)`.
    pub fn select_count(&mut self) -> &mut Self {
        self.select([count_star()])
    }

    pub fn group_by(&mut self, key: Expr) -> &mut Self {
        if self.usable() {
            self.clauses.group_by = Some(key);
        }
        self
    }

    pub fn having(&mut self, predicate: Expr) -> &mut Self {
        if self.usable() {
            self.clauses.having.push(predicate);
        }
        self
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Add or overwrite a SET entry; last write per column wins, first-write
    /// order is the render order.
    pub fn set(&mut self, column: &str, value: impl Into<Expr>) -> &mut Self {
        if !self.usable() {
            return self;
        }
        if column.is_empty() {
            self.latched
                .get_or_insert(ForgeError::invalid("SET column name is empty"));
            return self;
        }
        let value = value.into();
        match self.clauses.sets.iter_mut().find(|(c, _)| c == column) {
            Some(entry) => entry.1 = value,
            None => self.clauses.sets.push((column.to_string(), value)),
        }
        self
    }

    /// Mark the builder as an INSERT and fix the column list.
    pub fn insert_into(&mut self, columns: &[&str]) -> &mut Self {
        if self.usable() {
            self.clauses.insert = true;
            self.clauses.insert_columns = columns.iter().map(|c| c.to_string()).collect();
        }
        self
    }

    /// First VALUES row; defines the row arity.
    pub fn values(&mut self, row: Vec<Expr>) -> &mut Self {
        if !self.usable() {
            return self;
        }
        self.clauses.insert = true;
        if !self.clauses.insert_columns.is_empty() && row.len() != self.clauses.insert_columns.len()
        {
            self.latched.get_or_insert(ForgeError::ArityMismatch {
                expected: self.clauses.insert_columns.len(),
                got: row.len(),
            });
            return self;
        }
        self.clauses.insert_rows = vec![row];
        self
    }

    /// Additional VALUES row; must match the arity of the first.
    pub fn add_values(&mut self, row: Vec<Expr>) -> &mut Self {
        if !self.usable() {
            return self;
        }
        match self.clauses.insert_rows.first() {
            None => return self.values(row),
            Some(first) if first.len() != row.len() => {
                self.latched.get_or_insert(ForgeError::ArityMismatch {
                    expected: first.len(),
                    got: row.len(),
                });
            }
            Some(_) => self.clauses.insert_rows.push(row),
        }
        self
    }

    /// Mark the builder as a DELETE, optionally seeding a WHERE predicate.
    /// Rendering a DELETE with no predicate fails with
    /// [`ForgeError::MissingWhereGuard`].
    pub fn delete(&mut self, predicate: impl Into<Option<Expr>>) -> &mut Self {
        if self.usable() {
            self.clauses.delete = true;
            if let Some(p) = predicate.into() {
                self.clauses.filters.push(p);
            }
        }
        self
    }

    // ── Terminals ───────────────────────────────────────────────────

    fn ensure_renderable(&self) -> ForgeResult<()> {
        if self.disposed {
            return Err(ForgeError::Disposed);
        }
        if let Some(err) = &self.latched {
            return Err(err.clone());
        }
        Ok(())
    }

    /// Render the full statement with constants inlined.
    pub fn to_sql(&self) -> ForgeResult<String> {
        self.ensure_renderable()?;
        let mut compiler = ExprCompiler::inline(self.dialect.descriptor());
        render::render_statement(self, &mut compiler)
    }

    /// Render the full statement with parameters collected in
    /// first-encounter order.
    pub fn to_template(&self) -> ForgeResult<CompiledQuery> {
        self.ensure_renderable()?;
        let mut compiler = ExprCompiler::collecting(self.dialect.descriptor());
        let sql = render::render_statement(self, &mut compiler)?;
        let (params, warnings) = compiler.into_parts();
        Ok(CompiledQuery {
            sql,
            params,
            warnings,
        })
    }

    /// Render only the WHERE predicate list, without the `WHERE` keyword.
    /// Empty string when no predicate has been added.
    pub fn to_where_clause(&self) -> ForgeResult<String> {
        self.ensure_renderable()?;
        let mut compiler = ExprCompiler::inline(self.dialect.descriptor());
        Ok(compiler.render_predicates(&self.clauses.filters))
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Release accumulated clause buffers. Idempotent; any later call fails
    /// with [`ForgeError::Disposed`] (renders immediately, mutators via the
    /// next terminal).
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        debug!(table = %self.table, "disposing query builder");
        self.clauses = ClauseSet::default();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
