//! Statement assembly from an accumulated clause set.

use crate::ast::Expr;
use crate::builder::{QueryBuilder, StatementKind};
use crate::compiler::ExprCompiler;
use crate::diag::{DIAG_W007, Diagnostic};
use crate::error::{ForgeError, ForgeResult};
use tracing::debug;

pub(crate) fn render_statement(
    builder: &QueryBuilder,
    compiler: &mut ExprCompiler,
) -> ForgeResult<String> {
    let kind = builder.clauses.kind();
    debug!(
        dialect = compiler.descriptor().name,
        table = %builder.table,
        ?kind,
        "rendering statement"
    );
    match kind {
        StatementKind::Select => Ok(build_select(builder, compiler)),
        StatementKind::Update => Ok(build_update(builder, compiler)),
        StatementKind::Insert => build_insert(builder, compiler),
        StatementKind::Delete => build_delete(builder, compiler),
    }
}

fn push_where(sql: &mut String, builder: &QueryBuilder, compiler: &mut ExprCompiler) {
    if !builder.clauses.filters.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&compiler.render_predicates(&builder.clauses.filters));
    }
}

fn build_select(builder: &QueryBuilder, compiler: &mut ExprCompiler) -> String {
    let d = compiler.descriptor();
    let mut sql = String::from("SELECT ");

    match &builder.clauses.projection {
        None => sql.push('*'),
        Some(exprs) if exprs.is_empty() => sql.push('*'),
        Some(exprs) => {
            let cols: Vec<String> = exprs.iter().map(|e| compiler.render(e)).collect();
            sql.push_str(&cols.join(", "));
        }
    }

    sql.push_str(" FROM ");
    sql.push_str(&d.quote_identifier(&builder.table));

    push_where(&mut sql, builder, compiler);

    if let Some(key) = &builder.clauses.group_by {
        sql.push_str(" GROUP BY ");
        sql.push_str(&compiler.render(key));
    }

    if !builder.clauses.having.is_empty() {
        sql.push_str(" HAVING ");
        sql.push_str(&compiler.render_predicates(&builder.clauses.having));
    }

    if !builder.clauses.order_by.is_empty() {
        let entries: Vec<String> = builder
            .clauses
            .order_by
            .iter()
            .map(|(key, dir)| format!("{} {}", compiler.render(key), dir.sql_keyword()))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&entries.join(", "));
    }

    let (paging, skip_dropped) = d.paging(builder.clauses.skip, builder.clauses.take);
    sql.push_str(&paging);
    if skip_dropped {
        compiler.push_diagnostic(Diagnostic::warning(
            DIAG_W007,
            format!("dialect '{}' cannot express OFFSET; skip dropped", d.name),
        ));
    }

    sql
}

fn build_update(builder: &QueryBuilder, compiler: &mut ExprCompiler) -> String {
    let d = compiler.descriptor();
    let mut sql = String::from("UPDATE ");
    sql.push_str(&d.quote_identifier(&builder.table));
    sql.push_str(" SET ");

    let assignments: Vec<String> = builder
        .clauses
        .sets
        .iter()
        .map(|(column, value)| {
            let target = compiler.render(&Expr::Column(column.clone()));
            format!("{target} = {}", compiler.render(value))
        })
        .collect();
    sql.push_str(&assignments.join(", "));

    push_where(&mut sql, builder, compiler);
    sql
}

fn build_insert(builder: &QueryBuilder, compiler: &mut ExprCompiler) -> ForgeResult<String> {
    if builder.clauses.insert_rows.is_empty() {
        return Err(ForgeError::invalid(
            "INSERT requires at least one VALUES row",
        ));
    }
    let d = compiler.descriptor();
    let mut sql = String::from("INSERT INTO ");
    sql.push_str(&d.quote_identifier(&builder.table));

    if !builder.clauses.insert_columns.is_empty() {
        let cols: Vec<String> = builder
            .clauses
            .insert_columns
            .iter()
            .map(|c| compiler.render(&Expr::Column(c.clone())))
            .collect();
        sql.push_str(&format!(" ({})", cols.join(", ")));
    }

    let rows: Vec<String> = builder
        .clauses
        .insert_rows
        .iter()
        .map(|row| {
            let vals: Vec<String> = row.iter().map(|v| compiler.render(v)).collect();
            format!("({})", vals.join(", "))
        })
        .collect();
    sql.push_str(" VALUES ");
    sql.push_str(&rows.join(", "));
    Ok(sql)
}

fn build_delete(builder: &QueryBuilder, compiler: &mut ExprCompiler) -> ForgeResult<String> {
    if builder.clauses.filters.is_empty() {
        return Err(ForgeError::missing_where(builder.table.clone()));
    }
    let d = compiler.descriptor();
    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&d.quote_identifier(&builder.table));
    push_where(&mut sql, builder, compiler);
    Ok(sql)
}
