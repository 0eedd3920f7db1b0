use pretty_assertions::assert_eq;
use sqlforge::ast::builders::{col, count_star, param, val};
use sqlforge::ast::{SortOrder, Value};
use sqlforge::error::ForgeError;
use sqlforge::{Dialect, QueryBuilder};

#[test]
fn test_select_star_default() {
    let query = QueryBuilder::new("users", Dialect::Postgres);
    assert_eq!(query.to_sql().unwrap(), "SELECT * FROM \"users\"");
}

#[test]
fn test_n_filters_render_n_minus_one_ands() {
    for n in 1..5 {
        let mut query = QueryBuilder::new("users", Dialect::Postgres);
        for i in 0..n {
            query.filter(col(format!("C{i}")).eq(i as i64));
        }
        let sql = query.to_sql().unwrap();
        assert_eq!(sql.matches(" AND ").count(), n - 1, "for {n} filters");
    }
}

#[test]
fn test_filters_in_call_order() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query
        .filter(col("Active").eq(true))
        .and_filter(col("Age").gte(21));
    assert_eq!(
        query.to_sql().unwrap(),
        "SELECT * FROM \"users\" WHERE \"active\" = TRUE AND \"age\" >= 21"
    );
}

#[test]
fn test_none_filter_is_a_no_op() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.filter(None).filter(col("Age").gt(18)).filter(None);
    assert_eq!(
        query.to_sql().unwrap(),
        "SELECT * FROM \"users\" WHERE \"age\" > 18"
    );
}

#[test]
fn test_or_rooted_entry_is_parenthesized() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query
        .filter(col("Role").eq("admin").or(col("Role").eq("owner")))
        .filter(col("Active").eq(true));
    assert_eq!(
        query.to_sql().unwrap(),
        "SELECT * FROM \"users\" WHERE (\"role\" = 'admin' OR \"role\" = 'owner') AND \"active\" = TRUE"
    );
}

#[test]
fn test_where_clause_only() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    assert_eq!(query.to_where_clause().unwrap(), "");
    query.filter(col("Age").gt(18));
    let clause = query.to_where_clause().unwrap();
    assert_eq!(clause, "\"age\" > 18");
    assert!(!clause.contains("WHERE"));
}

#[test]
fn test_paging_round_trip_all_dialects() {
    for dialect in Dialect::ALL {
        let mut query = QueryBuilder::new("users", dialect);
        query
            .filter(col("Age").gt(18))
            .order_by(col("Name"), SortOrder::Asc)
            .skip(10)
            .take(20);
        let sql = query.to_sql().unwrap();
        assert!(sql.contains("ORDER BY"), "{dialect}: {sql}");
        assert!(sql.contains("20"), "{dialect}: {sql}");
        // Db2 cannot express the offset; every other dialect renders it.
        if dialect != Dialect::Db2 {
            assert!(sql.contains("10"), "{dialect}: {sql}");
        }
    }
}

#[test]
fn test_paging_sqlserver_offset_fetch() {
    let mut query = QueryBuilder::new("users", Dialect::SqlServer);
    query
        .order_by(col("Name"), SortOrder::Asc)
        .skip(10)
        .take(20);
    assert_eq!(
        query.to_sql().unwrap(),
        "SELECT * FROM [users] ORDER BY [name] ASC OFFSET 10 ROWS FETCH NEXT 20 ROWS ONLY"
    );
}

#[test]
fn test_paging_limit_offset_dialects() {
    for dialect in [Dialect::MySql, Dialect::Postgres, Dialect::Sqlite] {
        let mut query = QueryBuilder::new("users", dialect);
        query.skip(10).take(20);
        let sql = query.to_sql().unwrap();
        assert!(sql.ends_with("LIMIT 20 OFFSET 10"), "{dialect}: {sql}");
    }
}

#[test]
fn test_non_positive_paging_renders_literally() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.skip(-5).take(0);
    assert_eq!(
        query.to_sql().unwrap(),
        "SELECT * FROM \"users\" LIMIT 0 OFFSET -5"
    );
}

#[test]
fn test_string_quote_doubling_every_dialect() {
    for dialect in Dialect::ALL {
        let mut query = QueryBuilder::new("users", dialect);
        query.filter(col("Name").eq("O'Connor"));
        let sql = query.to_sql().unwrap();
        assert!(sql.contains("'O''Connor'"), "{dialect}: {sql}");
    }
}

#[test]
fn test_delete_guardrail() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.delete(None);
    assert_eq!(
        query.to_sql(),
        Err(ForgeError::MissingWhereGuard {
            table: "users".to_string()
        })
    );
    // Same builder with a predicate renders fine.
    query.filter(col("Id").eq(7));
    assert_eq!(
        query.to_sql().unwrap(),
        "DELETE FROM \"users\" WHERE \"id\" = 7"
    );
}

#[test]
fn test_delete_guardrail_applies_to_template_too() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.delete(None);
    assert!(matches!(
        query.to_template(),
        Err(ForgeError::MissingWhereGuard { .. })
    ));
}

#[test]
fn test_delete_with_seed_predicate() {
    let mut query = QueryBuilder::new("users", Dialect::SqlServer);
    query.delete(col("Id").eq(42));
    assert_eq!(
        query.to_sql().unwrap(),
        "DELETE FROM [users] WHERE [id] = 42"
    );
}

#[test]
fn test_update_set_order_and_last_write_wins() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query
        .set("Name", val("ann"))
        .set("Age", val(30))
        .set("Name", val("anna"))
        .filter(col("Id").eq(1));
    assert_eq!(
        query.to_sql().unwrap(),
        "UPDATE \"users\" SET \"name\" = 'anna', \"age\" = 30 WHERE \"id\" = 1"
    );
}

#[test]
fn test_set_empty_column_fails_at_terminal() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.set("", val(1));
    assert!(matches!(
        query.to_sql(),
        Err(ForgeError::InvalidArgument(_))
    ));
}

#[test]
fn test_insert_multi_row() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query
        .insert_into(&["Name", "Age"])
        .values(vec![val("ann"), val(30)])
        .add_values(vec![val("bob"), val(41)]);
    assert_eq!(
        query.to_sql().unwrap(),
        "INSERT INTO \"users\" (\"name\", \"age\") VALUES ('ann', 30), ('bob', 41)"
    );
}

#[test]
fn test_insert_arity_mismatch_is_fatal() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query
        .insert_into(&["Name", "Age"])
        .values(vec![val("ann"), val(30)])
        .add_values(vec![val("bob")]);
    assert_eq!(
        query.to_sql(),
        Err(ForgeError::ArityMismatch {
            expected: 2,
            got: 1
        })
    );
}

#[test]
fn test_insert_without_rows_fails() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.insert_into(&["Name"]);
    assert!(matches!(
        query.to_sql(),
        Err(ForgeError::InvalidArgument(_))
    ));
}

#[test]
fn test_projection_group_having() {
    let mut query = QueryBuilder::new("orders", Dialect::Postgres);
    query
        .select([col("CustomerId"), sqlforge::ast::builders::sum(col("Total"))])
        .group_by(col("CustomerId"))
        .having(sqlforge::ast::builders::sum(col("Total")).gt(1000));
    assert_eq!(
        query.to_sql().unwrap(),
        "SELECT \"customer_id\", SUM(\"total\") FROM \"orders\" GROUP BY \"customer_id\" HAVING SUM(\"total\") > 1000"
    );
}

#[test]
fn test_select_count() {
    let mut query = QueryBuilder::new("users", Dialect::MySql);
    query.select([count_star()]).filter(col("Active").eq(true));
    assert_eq!(
        query.to_sql().unwrap(),
        "SELECT COUNT(*) FROM `users` WHERE `active` = TRUE"
    );
}

#[test]
fn test_to_template_params_first_encounter_order() {
    let mut query = QueryBuilder::new("users", Dialect::SqlServer);
    query
        .filter(col("Age").gt(val(18)))
        .filter(col("Name").eq(param("UserName", "ann")))
        .take(20);
    let compiled = query.to_template().unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT * FROM [users] WHERE [age] > @p0 AND [name] = @user_name OFFSET 0 ROWS FETCH NEXT 20 ROWS ONLY"
    );
    assert_eq!(compiled.params.len(), 2);
    assert_eq!(compiled.params[0], ("p0".to_string(), Value::Int(18)));
    assert_eq!(
        compiled.params[1],
        ("user_name".to_string(), Value::Text("ann".to_string()))
    );
}

#[test]
fn test_to_template_rebinding_appears_twice() {
    let mut query = QueryBuilder::new("events", Dialect::Db2);
    query
        .filter(col("Start").gte(param("Day", 20240101i64)))
        .filter(col("End").lte(param("Day", 20240101i64)));
    let compiled = query.to_template().unwrap();
    assert_eq!(compiled.sql.matches('?').count(), 2);
    assert_eq!(compiled.params.len(), 2);
    assert_eq!(compiled.params[0].0, "day");
    assert_eq!(compiled.params[1].0, "day");
}

#[test]
fn test_renders_are_repeatable() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.filter(col("Age").gt(18));
    let first = query.to_sql().unwrap();
    let again = query.to_sql().unwrap();
    assert_eq!(first, again);
    let clause = query.to_where_clause().unwrap();
    assert_eq!(query.to_where_clause().unwrap(), clause);
}

#[test]
fn test_dispose_is_idempotent() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.dispose();
    query.dispose();
    assert!(query.is_disposed());
}

#[test]
fn test_render_after_dispose_fails_with_disposed() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.filter(col("Age").gt(18));
    query.dispose();
    assert_eq!(query.to_sql(), Err(ForgeError::Disposed));
    assert_eq!(query.to_where_clause(), Err(ForgeError::Disposed));
    assert!(matches!(query.to_template(), Err(ForgeError::Disposed)));
}

#[test]
fn test_mutator_after_dispose_surfaces_disposed() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.dispose();
    query.filter(col("Age").gt(18));
    assert_eq!(query.to_sql(), Err(ForgeError::Disposed));
}

#[test]
fn test_unknown_method_warning_in_template_output() {
    let mut query = QueryBuilder::new("users", Dialect::Postgres);
    query.filter(
        sqlforge::ast::Expr::Method {
            receiver: Some(Box::new(col("Name"))),
            name: "reverse".to_string(),
            args: vec![],
        }
        .eq(val("x")),
    );
    let compiled = query.to_template().unwrap();
    assert!(compiled.sql.contains("NULL"));
    assert_eq!(compiled.warnings.len(), 1);
    assert_eq!(compiled.warnings[0].code, sqlforge::diag::DIAG_W004);
}
