//! Execution path tests against an in-memory recording client.

use sqlweave::prelude::*;
use sqlweave::{QbError, QbResult};
use std::sync::Mutex;

#[derive(Default)]
struct RecordingClient {
    vendor: Option<Vendor>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl RecordingClient {
    fn new(vendor: Vendor) -> Self {
        Self {
            vendor: Some(vendor),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Dialect for RecordingClient {
    fn vendor(&self) -> Option<Vendor> {
        self.vendor
    }
}

impl GenericClient for RecordingClient {
    async fn execute(&self, sql: &str, params: &[Value]) -> QbResult<u64> {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        Ok(1)
    }
}

#[tokio::test]
async fn update_executes_once_with_numbered_placeholders() {
    let db = Db::new(RecordingClient::new(Vendor::PostgreSql));
    let affected = db
        .update("users", [("status", "inactive")], [eq("id", 7)])
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let calls = db.client().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "UPDATE users SET status = $1 WHERE id = $2 ");
    assert_eq!(calls[0].1, vec![Value::text("inactive"), Value::Int(7)]);
}

#[tokio::test]
async fn mysql_uses_question_marks() {
    let db = Db::new(RecordingClient::new(Vendor::MySql));
    db.insert("kv", [("k", "a"), ("v", "b")]).await.unwrap();
    let calls = db.client().calls();
    assert_eq!(calls[0].0, "INSERT INTO kv (k, v) VALUES (?, ?)");
    assert_eq!(calls[0].1.len(), 2);
}

#[tokio::test]
async fn escaped_mode_forwards_no_params() {
    let db = Db::with_config(
        RecordingClient::new(Vendor::Sqlite3),
        ComposerConfig::new().escaped(),
    );
    db.delete("sessions", [lt("expires_at", "2024-01-01")])
        .await
        .unwrap();
    let calls = db.client().calls();
    assert_eq!(calls[0].0, "DELETE FROM sessions WHERE expires_at < '2024-01-01' ");
    assert!(calls[0].1.is_empty());
}

#[tokio::test]
async fn escaped_literal_may_contain_marker_text() {
    let db = Db::with_config(
        RecordingClient::new(Vendor::MySql),
        ComposerConfig::new().escaped(),
    );
    let body = format!("see {} docs", sqlweave::PLACEHOLDER);
    assert_eq!(db.insert("notes", [("body", body.as_str())]).await.unwrap(), 1);

    let calls = db.client().calls();
    assert_eq!(calls[0].0, format!("INSERT INTO notes (body) VALUES ('{body}')"));
    assert!(calls[0].1.is_empty());
}

#[tokio::test]
async fn rejected_build_never_reaches_the_client() {
    let db = Db::new(RecordingClient::new(Vendor::MySql));
    let err = db
        .update("t", [("a", 1)], [like("b", "plain")])
        .await
        .unwrap_err();
    assert!(matches!(err, QbError::MissingWildcard(_)));
    assert!(db.client().calls().is_empty());
}

#[tokio::test]
async fn ddl_through_db() {
    let db = Db::new(RecordingClient::new(Vendor::PostgreSql));
    let defs = db
        .build(|qb| {
            let schema = qb.schema();
            Ok(vec![
                schema.column("id", "bigint", &[sqlweave::schema::AUTO.into()])?,
                schema.column("email", "varchar", &[255u32.into(), "NOT NULL".into()])?,
            ])
        })
        .await
        .unwrap();
    db.create("accounts", &defs).await.unwrap();
    db.drop("accounts").await.unwrap();

    let calls = db.client().calls();
    assert_eq!(
        calls[0].0,
        "CREATE TABLE IF NOT EXISTS accounts (id BIGINT GENERATED BY DEFAULT AS IDENTITY, \
         email VARCHAR(255) NOT NULL)"
    );
    assert_eq!(calls[1].0, "DROP TABLE IF EXISTS accounts");
}

#[tokio::test]
async fn concurrent_builds_keep_params_separate() {
    let db = Db::new(RecordingClient::new(Vendor::PostgreSql));
    let (a, b, c) = tokio::join!(
        db.update("t", [("a", 1)], [eq("id", 10)]),
        db.update("t", [("a", 2), ("b", 3)], [in_list("id", [20, 21])]),
        db.delete("t", [between("id", 30, 39)]),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    for (sql, params) in db.client().calls() {
        let highest = (1..=params.len()).rev().find(|n| sql.contains(&format!("${n}")));
        assert_eq!(highest, Some(params.len()), "{sql}");
        assert!(!sql.contains(&format!("${}", params.len() + 1)), "{sql}");
    }
}

#[tokio::test]
async fn statement_without_vendor_cannot_bind() {
    let client = RecordingClient::default();
    let mut qb = Composer::new(Vendor::MySql);
    let stmt = qb.delete("t", [eq("id", 1)]).unwrap();
    let err = stmt.execute(&client).await.unwrap_err();
    assert!(matches!(err, QbError::NoVendor));

    let plain = qb.drop("t").unwrap();
    assert_eq!(plain.execute(&client).await.unwrap(), 1);
    assert_eq!(client.calls()[0].0, "DROP TABLE IF EXISTS t");
}
