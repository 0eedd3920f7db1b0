//! Per-token resolution against entity metadata and the dialect descriptor.

use crate::diag::{DIAG_E001, DIAG_W001, DIAG_W003, DIAG_W006, Diagnostic};
use crate::dialect::DialectDescriptor;
use crate::meta::{ColumnMeta, EntityMeta};
use crate::template::token::TemplateToken;
use crate::template::{ProcessedTemplate, TemplateContext};

/// Token names the engine resolves.
pub const KNOWN_TOKENS: &[&str] = &[
    "table", "columns", "where", "set", "values", "orderby", "limit", "count", "joins",
];

/// Resolve one token. `None` leaves the raw token text in the output.
pub(crate) fn resolve(
    token: &TemplateToken,
    ctx: &TemplateContext<'_>,
    out: &mut ProcessedTemplate,
) -> Option<String> {
    let d = ctx.dialect.descriptor();
    match token.name.as_str() {
        "table" => resolve_table(token, d, ctx, out),
        "columns" => resolve_columns(token, d, ctx, out),
        "where" => resolve_where(token, d, ctx, out),
        "set" => resolve_set(token, d, ctx, out),
        "values" => resolve_values(token, d, ctx, out),
        "orderby" => resolve_orderby(token, d, ctx, out),
        "limit" => resolve_limit(token, d, out),
        "count" => resolve_count(token, d),
        "joins" => resolve_joins(token, d, out),
        unknown => {
            let mut message = format!("unknown token '{unknown}' left verbatim");
            if let Some(candidate) = suggest_token(unknown) {
                message.push_str(&format!("; did you mean '{{{{{candidate}}}}}'?"));
            }
            out.warnings.push(Diagnostic::warning(DIAG_W001, message));
            None
        }
    }
}

fn suggest_token(unknown: &str) -> Option<&'static str> {
    KNOWN_TOKENS
        .iter()
        .map(|t| (strsim::levenshtein(unknown, t), *t))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, t)| t)
}

/// Entity metadata, or record the miss for a column-dependent token.
fn require_entity<'a>(
    token: &TemplateToken,
    ctx: &TemplateContext<'a>,
    out: &mut ProcessedTemplate,
) -> Option<&'a EntityMeta> {
    if ctx.entity.is_none() {
        out.errors.push(Diagnostic::error(
            DIAG_E001,
            format!("token '{{{{{}}}}}' requires entity metadata", token.name),
        ));
    }
    ctx.entity
}

/// Apply `include=`/`exclude=` filters to the entity columns.
fn filtered_columns<'e>(token: &TemplateToken, entity: &'e EntityMeta) -> Vec<&'e ColumnMeta> {
    let include: Option<Vec<&str>> = token
        .get("include")
        .map(|csv| csv.split(',').map(str::trim).collect());
    let exclude: Vec<&str> = token
        .get("exclude")
        .map(|csv| csv.split(',').map(str::trim).collect())
        .unwrap_or_default();

    entity
        .columns
        .iter()
        .filter(|c| {
            include
                .as_ref()
                .is_none_or(|names| names.iter().any(|n| c.matches(n)))
        })
        .filter(|c| !exclude.iter().any(|n| c.matches(n)))
        .collect()
}

fn placeholder_for(
    column: &ColumnMeta,
    d: &DialectDescriptor,
    ctx: &TemplateContext<'_>,
    out: &mut ProcessedTemplate,
) -> String {
    let name = column.storage_name();
    if !ctx.bound_params.is_empty()
        && !ctx
            .bound_params
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&name))
    {
        out.warnings.push(Diagnostic::warning(
            DIAG_W003,
            format!("parameter '{name}' is not among the bound parameter names"),
        ));
    }
    d.placeholder(&name)
}

fn resolve_table(
    token: &TemplateToken,
    d: &DialectDescriptor,
    ctx: &TemplateContext<'_>,
    out: &mut ProcessedTemplate,
) -> Option<String> {
    let entity = require_entity(token, ctx, out)?;
    let quoted = d.quote_identifier(&entity.table);
    match token.get("alias") {
        Some(alias) => Some(format!("{quoted} AS {}", d.quote_identifier(alias))),
        None => Some(quoted),
    }
}

fn resolve_columns(
    token: &TemplateToken,
    d: &DialectDescriptor,
    ctx: &TemplateContext<'_>,
    out: &mut ProcessedTemplate,
) -> Option<String> {
    let entity = require_entity(token, ctx, out)?;
    let alias = token.get("alias");
    let cols: Vec<String> = filtered_columns(token, entity)
        .into_iter()
        .map(|c| {
            let quoted = d.quote_identifier(&c.storage_name());
            match alias {
                Some(a) => format!("{}.{quoted}", d.quote_identifier(a)),
                None => quoted,
            }
        })
        .collect();
    Some(cols.join(", "))
}

fn resolve_where(
    token: &TemplateToken,
    d: &DialectDescriptor,
    ctx: &TemplateContext<'_>,
    out: &mut ProcessedTemplate,
) -> Option<String> {
    if let Some(default) = token.get("default") {
        return Some(format!("WHERE {default}"));
    }
    let entity = require_entity(token, ctx, out)?;

    let columns: Vec<&ColumnMeta> = if token.args.is_empty() || token.has_arg("auto") {
        entity.primary_keys().collect()
    } else {
        let mut resolved = Vec::new();
        for name in &token.args {
            match entity.find(name) {
                Some(c) => resolved.push(c),
                None => out.warnings.push(Diagnostic::warning(
                    DIAG_W003,
                    format!("column '{name}' not found on entity '{}'", entity.table),
                )),
            }
        }
        resolved
    };

    if columns.is_empty() {
        out.warnings.push(Diagnostic::warning(
            DIAG_W006,
            "where token resolved no columns".to_string(),
        ));
        return None;
    }

    let parts: Vec<String> = columns
        .into_iter()
        .map(|c| {
            let quoted = d.quote_identifier(&c.storage_name());
            let ph = placeholder_for(c, d, ctx, out);
            format!("{quoted} = {ph}")
        })
        .collect();
    Some(format!("WHERE {}", parts.join(" AND ")))
}

fn resolve_set(
    token: &TemplateToken,
    d: &DialectDescriptor,
    ctx: &TemplateContext<'_>,
    out: &mut ProcessedTemplate,
) -> Option<String> {
    let entity = require_entity(token, ctx, out)?;
    let assignments: Vec<String> = filtered_columns(token, entity)
        .into_iter()
        .filter(|c| !c.primary_key)
        .map(|c| {
            let quoted = d.quote_identifier(&c.storage_name());
            let ph = placeholder_for(c, d, ctx, out);
            format!("{quoted} = {ph}")
        })
        .collect();
    if assignments.is_empty() {
        out.warnings.push(Diagnostic::warning(
            DIAG_W006,
            "set token resolved no columns".to_string(),
        ));
        return None;
    }
    Some(format!("SET {}", assignments.join(", ")))
}

fn resolve_values(
    token: &TemplateToken,
    d: &DialectDescriptor,
    ctx: &TemplateContext<'_>,
    out: &mut ProcessedTemplate,
) -> Option<String> {
    let entity = require_entity(token, ctx, out)?;
    let placeholders: Vec<String> = filtered_columns(token, entity)
        .into_iter()
        .map(|c| placeholder_for(c, d, ctx, out))
        .collect();
    if placeholders.is_empty() {
        out.warnings.push(Diagnostic::warning(
            DIAG_W006,
            "values token resolved no columns".to_string(),
        ));
        return None;
    }
    Some(format!("VALUES ({})", placeholders.join(", ")))
}

fn resolve_orderby(
    token: &TemplateToken,
    d: &DialectDescriptor,
    ctx: &TemplateContext<'_>,
    out: &mut ProcessedTemplate,
) -> Option<String> {
    if let Some(column) = token.first_arg() {
        return Some(format!("ORDER BY {}", d.quote_identifier(column)));
    }
    if let Some(default) = token.get("default") {
        return Some(format!("ORDER BY {default}"));
    }
    // Fall back to the primary key.
    let entity = require_entity(token, ctx, out)?;
    let pks: Vec<String> = entity
        .primary_keys()
        .map(|c| d.quote_identifier(&c.storage_name()))
        .collect();
    if pks.is_empty() {
        out.warnings.push(Diagnostic::warning(
            DIAG_W006,
            "orderby token has no column, no default, and no primary key".to_string(),
        ));
        return None;
    }
    Some(format!("ORDER BY {}", pks.join(", ")))
}

fn resolve_limit(
    token: &TemplateToken,
    d: &DialectDescriptor,
    out: &mut ProcessedTemplate,
) -> Option<String> {
    let Some(default) = token.get("default") else {
        out.warnings.push(Diagnostic::warning(
            DIAG_W006,
            "limit token requires default=<n>".to_string(),
        ));
        return None;
    };
    let Ok(n) = default.trim().parse::<i64>() else {
        out.warnings.push(Diagnostic::warning(
            DIAG_W006,
            format!("limit default '{default}' is not an integer"),
        ));
        return None;
    };
    // Counts are inlined; dialects reject parameterized LIMIT.
    let (paging, _) = d.paging(None, Some(n));
    Some(paging.trim_start().to_string())
}

fn resolve_count(token: &TemplateToken, d: &DialectDescriptor) -> Option<String> {
    match token.get("column") {
        Some(column) => Some(format!("COUNT({})", d.quote_identifier(column))),
        None => Some("COUNT(*)".to_string()),
    }
}

fn resolve_joins(
    token: &TemplateToken,
    d: &DialectDescriptor,
    out: &mut ProcessedTemplate,
) -> Option<String> {
    let (Some(table), Some(on)) = (token.get("table"), token.get("on")) else {
        out.warnings.push(Diagnostic::warning(
            DIAG_W006,
            "joins token requires table=<t> and on=<cond>".to_string(),
        ));
        return None;
    };
    let kind = token.get("type").unwrap_or("INNER").to_ascii_uppercase();
    let mut sql = format!("{kind} JOIN {}", d.quote_identifier(table));
    if let Some(alias) = token.get("alias") {
        sql.push_str(&format!(" AS {}", d.quote_identifier(alias)));
    }
    sql.push_str(&format!(" ON {on}"));
    Some(sql)
}
