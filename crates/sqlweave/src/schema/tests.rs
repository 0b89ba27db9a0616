use super::*;

fn mysql() -> Schema<'static> {
    Schema::new(&Vendor::MySql)
}

fn pg() -> Schema<'static> {
    Schema::new(&Vendor::PostgreSql)
}

#[test]
fn fixed_point_precision_and_default() {
    assert_eq!(
        mysql()
            .column("price", NUMERIC, &[6u32.into(), 2u32.into()])
            .unwrap(),
        "price NUMERIC(6,2)"
    );
    assert_eq!(
        mysql().column("price", NUMERIC, &[]).unwrap(),
        "price NUMERIC(10,2)"
    );
    assert_eq!(
        pg().column("total", "decimal", &[12u32.into(), "NOT NULL".into()])
            .unwrap(),
        "total DECIMAL(12,2) NOT NULL"
    );
}

#[test]
fn sized_string_with_options() {
    assert_eq!(
        mysql()
            .column("name", VARCHAR, &[80u32.into(), "NOT NULL".into(), "DEFAULT ''".into()])
            .unwrap(),
        "name VARCHAR(80) NOT NULL DEFAULT ''"
    );
}

#[test]
fn literal_after_type() {
    assert_eq!(
        mysql()
            .column("qty", INT, &["UNSIGNED".into(), "NOT NULL".into()])
            .unwrap(),
        "qty INT UNSIGNED NOT NULL"
    );
}

#[test]
fn auto_increment_per_vendor() {
    let args: [SchemaArg; 2] = ["NOT NULL".into(), AUTO.into()];
    assert_eq!(
        mysql().column("id", INTEGER, &args).unwrap(),
        "id INTEGER NOT NULL AUTO_INCREMENT"
    );
    assert_eq!(
        pg().column("id", BIGINT, &args).unwrap(),
        "id BIGINT NOT NULL GENERATED BY DEFAULT AS IDENTITY"
    );
    assert_eq!(
        Schema::new(&Vendor::SqlServer)
            .column("id", INT, &args)
            .unwrap(),
        "id INT NOT NULL IDENTITY(1,1)"
    );
    assert_eq!(
        Schema::new(&Vendor::Sqlite3)
            .column("id", INTEGER, &[SEQUENCE.into()])
            .unwrap(),
        "id INTEGER AUTOINCREMENT"
    );
}

#[test]
fn large_object_takes_tokens_only() {
    assert_eq!(pg().column("doc", "jsonb", &["NULL".into()]).unwrap(), "doc JSONB NULL");
    assert_eq!(mysql().datatype(BLOB, &[]).unwrap(), "BLOB");
}

#[test]
fn unknown_type_is_hard_failure() {
    let err = pg().column("x", "MEDIUMBLOB", &[]).unwrap_err();
    assert!(err.is_unknown_data_type());
    assert!(!err.is_soft());
}

#[test]
fn missing_vendor_is_soft_failure() {
    let none: Option<Vendor> = None;
    let err = Schema::new(&none).column("x", INT, &[]).unwrap_err();
    assert!(matches!(err, QbError::NoVendor));
    assert!(err.is_soft());
}

#[test]
fn key_constraints() {
    assert_eq!(
        mysql().primary("pk_users", ["id"]).unwrap(),
        "CONSTRAINT pk_users PRIMARY KEY (id)"
    );
    assert_eq!(
        mysql().unique("uq_email", ["tenant_id", "email"]).unwrap(),
        "CONSTRAINT uq_email UNIQUE (tenant_id, email)"
    );
    assert_eq!(
        pg().foreign("fk_orders_user", ["user_id"], "users", ["id"])
            .unwrap(),
        "CONSTRAINT fk_orders_user FOREIGN KEY (user_id) REFERENCES users (id)"
    );
    assert_eq!(
        mysql().index("idx_created", ["created_at"]).unwrap(),
        "INDEX idx_created (created_at)"
    );
    assert!(mysql().primary("pk", Vec::<&str>::new()).is_err());
}

#[test]
fn alter_actions() {
    assert_eq!(
        pg().add_column("nickname", VARCHAR, &[40u32.into()]).unwrap(),
        "ADD nickname VARCHAR(40)"
    );
    assert_eq!(pg().drop_column("nickname").unwrap(), "DROP COLUMN nickname");
    assert_eq!(
        pg().changing_column("age", SMALLINT, &[]).unwrap(),
        "ALTER COLUMN age TYPE SMALLINT"
    );
    assert_eq!(
        mysql().changing_column("age", SMALLINT, &[]).unwrap(),
        "MODIFY age SMALLINT"
    );
    assert_eq!(
        Schema::new(&Vendor::SqlServer)
            .changing_column("age", SMALLINT, &[])
            .unwrap(),
        "ALTER COLUMN age SMALLINT"
    );
}

#[test]
fn sqlite_cannot_change_columns() {
    let err = Schema::new(&Vendor::Sqlite3)
        .changing_column("age", INTEGER, &[])
        .unwrap_err();
    assert!(matches!(err, QbError::Unsupported { .. }));
}

#[test]
fn parse_exposes_slots() {
    let column = ColumnSchema::parse(
        Vendor::MySql,
        Some("title"),
        "varchar",
        &[120u32.into(), "NOT NULL".into()],
    )
    .unwrap();
    assert_eq!(column.category, TypeCategory::String);
    assert_eq!(column.type_name, "VARCHAR");
    assert_eq!(column.size, Some(120));
    assert_eq!(column.options, vec!["NOT NULL".to_string()]);
}
