use pretty_assertions::assert_eq;
use sqlforge::Dialect;
use sqlforge::meta::{ColumnMeta, EntityMeta, TypeTag};
use sqlforge::template::{TemplateContext, process_template};

fn user_entity() -> EntityMeta {
    EntityMeta::new("User")
        .column(ColumnMeta::new("Id", TypeTag::Int).primary_key())
        .column(ColumnMeta::new("UserName", TypeTag::Text))
        .column(ColumnMeta::new("Email", TypeTag::Text).nullable())
        .column(ColumnMeta::new("CreatedAt", TypeTag::DateTime))
}

fn ctx(dialect: Dialect, entity: &EntityMeta) -> TemplateContext<'_> {
    TemplateContext::new(dialect).with_entity(entity)
}

#[test]
fn test_table_token_quoting_per_dialect() {
    let entity = user_entity();
    let expected = [
        (Dialect::SqlServer, "[User]"),
        (Dialect::MySql, "`User`"),
        (Dialect::Postgres, "\"User\""),
        (Dialect::Oracle, "\"User\""),
        (Dialect::Db2, "\"User\""),
        (Dialect::Sqlite, "\"User\""),
    ];
    for (dialect, quoted) in expected {
        let out = process_template("{{table}}", &ctx(dialect, &entity));
        assert_eq!(out.sql, quoted, "{dialect}");
        assert!(out.is_clean());
    }
}

#[test]
fn test_table_alias() {
    let entity = user_entity();
    let out = process_template("{{table:alias=u}}", &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, "\"User\" AS \"u\"");
}

#[test]
fn test_columns_default_all() {
    let entity = user_entity();
    let out = process_template("{{columns}}", &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, "\"id\", \"user_name\", \"email\", \"created_at\"");
}

#[test]
fn test_columns_include_exclude() {
    let entity = user_entity();
    let out = process_template(
        "{{columns:auto|exclude=Email,CreatedAt}}",
        &ctx(Dialect::Postgres, &entity),
    );
    assert_eq!(out.sql, "\"id\", \"user_name\"");

    let out = process_template(
        "{{columns:auto|include=UserName}}",
        &ctx(Dialect::Postgres, &entity),
    );
    assert_eq!(out.sql, "\"user_name\"");
}

#[test]
fn test_columns_alias_prefix() {
    let entity = user_entity();
    let out = process_template(
        "{{columns:auto|include=Id|alias=u}}",
        &ctx(Dialect::Postgres, &entity),
    );
    assert_eq!(out.sql, "\"u\".\"id\"");
}

#[test]
fn test_where_by_primary_key() {
    let entity = user_entity();
    let out = process_template("{{where:auto}}", &ctx(Dialect::SqlServer, &entity));
    assert_eq!(out.sql, "WHERE [id] = @id");
    let out = process_template("{{where:auto}}", &ctx(Dialect::Db2, &entity));
    assert_eq!(out.sql, "WHERE \"id\" = ?");
}

#[test]
fn test_where_by_named_column() {
    let entity = user_entity();
    let out = process_template("{{where:UserName}}", &ctx(Dialect::Oracle, &entity));
    assert_eq!(out.sql, "WHERE \"user_name\" = :user_name");
}

#[test]
fn test_where_default_literal() {
    let entity = user_entity();
    let out = process_template("{{where:default=1 = 1}}", &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, "WHERE 1 = 1");
}

#[test]
fn test_set_excludes_primary_key() {
    let entity = user_entity();
    let out = process_template("{{set:auto}}", &ctx(Dialect::Postgres, &entity));
    assert_eq!(
        out.sql,
        "SET \"user_name\" = @user_name, \"email\" = @email, \"created_at\" = @created_at"
    );
}

#[test]
fn test_set_with_exclude() {
    let entity = user_entity();
    let out = process_template(
        "{{set:auto|exclude=CreatedAt}}",
        &ctx(Dialect::Postgres, &entity),
    );
    assert_eq!(out.sql, "SET \"user_name\" = @user_name, \"email\" = @email");
}

#[test]
fn test_values_token() {
    let entity = user_entity();
    let out = process_template("{{values:auto}}", &ctx(Dialect::SqlServer, &entity));
    assert_eq!(out.sql, "VALUES (@id, @user_name, @email, @created_at)");
}

#[test]
fn test_full_statement_assembly() {
    let entity = user_entity();
    let template = "UPDATE {{table}} {{set:auto|exclude=CreatedAt}} {{where:auto}}";
    let out = process_template(template, &ctx(Dialect::SqlServer, &entity));
    assert_eq!(
        out.sql,
        "UPDATE [User] SET [user_name] = @user_name, [email] = @email WHERE [id] = @id"
    );
    assert!(out.is_clean());
}

#[test]
fn test_orderby_variants() {
    let entity = user_entity();
    let out = process_template("{{orderby:UserName}}", &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, "ORDER BY \"UserName\"");

    let out = process_template(
        "{{orderby:default=created_at DESC}}",
        &ctx(Dialect::Postgres, &entity),
    );
    assert_eq!(out.sql, "ORDER BY created_at DESC");

    // Falls back to the primary key.
    let out = process_template("{{orderby}}", &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, "ORDER BY \"id\"");
}

#[test]
fn test_limit_token() {
    let entity = user_entity();
    let out = process_template("{{limit:default=50}}", &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, "LIMIT 50");
    let out = process_template("{{limit:default=50}}", &ctx(Dialect::Db2, &entity));
    assert_eq!(out.sql, "FETCH FIRST 50 ROWS ONLY");
}

#[test]
fn test_limit_without_default_warns_and_stays() {
    let entity = user_entity();
    let out = process_template("{{limit}}", &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, "{{limit}}");
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_count_token() {
    let entity = user_entity();
    let out = process_template("SELECT {{count}}", &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, "SELECT COUNT(*)");
    let out = process_template(
        "SELECT {{count:column=Id}}",
        &ctx(Dialect::Postgres, &entity),
    );
    assert_eq!(out.sql, "SELECT COUNT(\"Id\")");
}

#[test]
fn test_joins_token() {
    let entity = user_entity();
    let out = process_template(
        "{{joins:type=LEFT,table=orders,on=o.user_id = u.id,alias=o}}",
        &ctx(Dialect::Postgres, &entity),
    );
    assert_eq!(out.sql, "LEFT JOIN \"orders\" AS \"o\" ON o.user_id = u.id");
}

#[test]
fn test_joins_missing_parts_stays_verbatim() {
    let entity = user_entity();
    let raw = "{{joins:type=LEFT}}";
    let out = process_template(raw, &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, raw);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_unknown_tokens_left_verbatim_with_one_warning_each() {
    let entity = user_entity();
    let template = "{{tabel}} and {{colums}}";
    let out = process_template(template, &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, template);
    assert_eq!(out.warnings.len(), 2);
    // Close misspellings get a suggestion.
    assert!(out.warnings[0].message.contains("did you mean"));
}

#[test]
fn test_malformed_tokens_never_panic() {
    let entity = user_entity();
    for template in [
        "{{",
        "{{}}",
        "{{:}}",
        "{{table",
        "x {{table}y",
        "{{ table with spaces }}",
        "{{table}}{{",
    ] {
        let out = process_template(template, &ctx(Dialect::Postgres, &entity));
        assert!(!out.warnings.is_empty(), "expected a warning for {template:?}");
    }
}

#[test]
fn test_empty_template_warns() {
    let entity = user_entity();
    let out = process_template("", &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, "");
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_missing_entity_records_error_and_completes() {
    let ctx = TemplateContext::new(Dialect::Postgres);
    let out = process_template("SELECT {{columns}} FROM {{table}}", &ctx);
    // The pass completes and keeps the unresolvable tokens.
    assert_eq!(out.sql, "SELECT {{columns}} FROM {{table}}");
    assert_eq!(out.errors.len(), 2);
}

#[test]
fn test_entity_free_tokens_work_without_metadata() {
    let ctx = TemplateContext::new(Dialect::Postgres);
    let out = process_template("{{count}} {{limit:default=10}}", &ctx);
    assert_eq!(out.sql, "COUNT(*) LIMIT 10");
    assert!(out.is_clean());
}

#[test]
fn test_resolved_text_is_not_rescanned() {
    let entity = EntityMeta::new("{{table}}")
        .column(ColumnMeta::new("Id", TypeTag::Int).primary_key());
    let out = process_template("{{table}}", &ctx(Dialect::Postgres, &entity));
    // The table name itself looks like a token; it must come through quoted,
    // not resolved again.
    assert_eq!(out.sql, "\"{{table}}\"");
    assert!(out.is_clean());
}

#[test]
fn test_many_repeated_tokens_bounded() {
    let entity = user_entity();
    let template = "{{table}} ".repeat(500);
    let out = process_template(&template, &ctx(Dialect::Postgres, &entity));
    assert_eq!(out.sql, "\"User\" ".repeat(500));
    assert!(out.is_clean());
}

#[test]
fn test_bound_param_advisory_warning() {
    let entity = user_entity();
    let bound = vec!["id".to_string()];
    let ctx = TemplateContext::new(Dialect::Postgres)
        .with_entity(&entity)
        .with_bound_params(&bound);
    let out = process_template("{{where:auto}}", &ctx);
    assert_eq!(out.sql, "WHERE \"id\" = @id");
    assert!(out.is_clean());

    let out = process_template("{{where:UserName}}", &ctx);
    assert_eq!(out.warnings.len(), 1);
}
