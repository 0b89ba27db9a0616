//! End-to-end statement assembly through the public API.

use sqlweave::prelude::*;
use sqlweave::schema::{NUMERIC, VARCHAR};
use sqlweave::{PLACEHOLDER, QbError, count_placeholders};

#[test]
fn config_from_toml_drives_the_composer() {
    let config = ComposerConfig::from_toml_str(
        r#"
vendor = "mssql"
prepare = false
"#,
    )
    .unwrap();
    let mut qb = Composer::from_config(config);
    assert_eq!(qb.vendor(), Some(Vendor::SqlServer));

    let stmt = qb.select("people", ["name"], [eq("name", "O'Neil")]).unwrap();
    assert_eq!(stmt.sql(), "SELECT name FROM people WHERE name = 'O''Neil' ");
}

#[test]
fn placeholders_match_params_for_every_vendor() {
    for vendor in Vendor::ALL {
        let mut qb = Composer::new(vendor);
        let stmt = qb
            .select(
                "events",
                ["*"],
                [
                    Clause::from(eq("kind", "click")),
                    in_list("source", ["web", "ios", "android"]).into(),
                    not_between("score", 0, 10).into(),
                    is_null("deleted_at").into(),
                ],
            )
            .unwrap();
        assert_eq!(count_placeholders(stmt.sql()), stmt.params().len());
        assert_eq!(stmt.params().len(), 6);

        let native = stmt.to_vendor_sql(vendor);
        assert!(!native.contains(PLACEHOLDER));
        match vendor {
            Vendor::PostgreSql => assert!(native.contains("$6")),
            _ => assert_eq!(native.matches('?').count(), 6),
        }
    }
}

#[test]
fn clause_never_ends_with_combinator() {
    let mut qb = Composer::new(Vendor::MySql);
    let f = qb
        .where_clause([eq("a", 1).or(), eq("b", 2).and_not()])
        .unwrap();
    let body = f.as_str().trim_end();
    for combinator in ["AND", "OR", "NOT", "AND NOT"] {
        assert!(!body.ends_with(combinator), "{body}");
    }
    assert_eq!(
        f.as_str(),
        format!(" WHERE a = {PLACEHOLDER} OR b = {PLACEHOLDER} ")
    );
}

#[test]
fn escaped_and_prepared_differ_only_in_values() {
    let mut prepared = Composer::new(Vendor::PostgreSql);
    let mut escaped =
        Composer::new(Vendor::PostgreSql).with_config(ComposerConfig::new().escaped());

    let p = prepared.where_clause([eq("a", 1)]).unwrap();
    let e = escaped.where_clause([eq("a", 1)]).unwrap();
    assert_eq!(p.as_str().replace(PLACEHOLDER, "'1'"), e.as_str());
}

#[test]
fn like_patterns() {
    let mut qb = Composer::new(Vendor::MySql);
    assert!(qb.where_clause([like("col", "%ok%")]).is_ok());
    assert!(matches!(
        qb.where_clause([like("col", "novalidpattern")]),
        Err(QbError::MissingWildcard(_))
    ));
    assert!(qb.where_clause([not_like("col", "a_c")]).is_ok());
}

#[test]
fn joins_compose_with_conditions() {
    let mut qb = Composer::new(Vendor::MySql).with_config(ComposerConfig::new().escaped());
    let orders = left_join("users", "orders", "id")
        .right_column("user_id")
        .alias("o")
        .build()
        .unwrap();
    let stmt = qb
        .select(
            "users",
            ["users.id", "COUNT(o.id)"],
            [
                Clause::from(orders),
                group_by(["users.id"]).unwrap().into(),
                gte("users.created_at", "2024-01-01").into(),
            ],
        )
        .unwrap();
    assert_eq!(
        stmt.sql(),
        "SELECT users.id, COUNT(o.id) FROM users LEFT JOIN orders AS o ON users.id = o.user_id \
         WHERE users.created_at >= '2024-01-01' GROUP BY users.id "
    );
}

#[test]
fn schema_through_composer() {
    let qb = Composer::new(Vendor::PostgreSql);
    let schema = qb.schema();
    assert_eq!(
        schema.column("price", NUMERIC, &[6u32.into(), 2u32.into()]).unwrap(),
        "price NUMERIC(6,2)"
    );
    assert_eq!(
        schema.column("price", NUMERIC, &[]).unwrap(),
        "price NUMERIC(10,2)"
    );
    assert_eq!(
        schema.datatype(VARCHAR, &[32u32.into()]).unwrap(),
        "VARCHAR(32)"
    );
    assert!(schema.column("x", "NOT_A_TYPE", &[]).unwrap_err().is_unknown_data_type());
}
