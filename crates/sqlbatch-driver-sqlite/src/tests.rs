//! Tests for the SQLite execution handle

use super::*;
use pretty_assertions::assert_eq;
use sqlbatch_core::{Connection, ConnectionConfig, DatabaseDriver, Dialect, Transaction, Value};

const SCHEMA: &str = "CREATE TABLE mytable (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    other TEXT NOT NULL
)";

async fn setup() -> SqliteConnection {
    let conn = SqliteConnection::open_in_memory().expect("open in-memory database");
    conn.execute_script(SCHEMA).await.expect("create schema");
    conn
}

#[tokio::test]
async fn test_execute_binds_positional_params() {
    let conn = setup().await;

    let result = conn
        .execute(
            "INSERT INTO mytable (id, name, other) VALUES (?, ?, ?), (?, ?, ?)",
            &[
                Value::Null,
                Value::from("roobs"),
                Value::from("dev"),
                Value::Null,
                Value::from("bb"),
                Value::from("boss"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(result.affected_rows, 2);

    let rows = conn
        .query("SELECT id, name, other FROM mytable ORDER BY id", &[])
        .await
        .unwrap();
    assert_eq!(rows.row_count(), 2);
    assert_eq!(rows.rows[0].get_by_name("id"), Some(&Value::Int64(1)));
    assert_eq!(rows.rows[1].get_by_name("name"), Some(&Value::from("bb")));
}

#[tokio::test]
async fn test_execute_reports_syntax_errors() {
    let conn = setup().await;

    let result = conn.execute("THIS IS A BAD QUERY", &[]).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_transaction_rollback_on_drop() {
    let conn = setup().await;

    {
        let tx = conn.begin_transaction().await.unwrap();
        tx.execute(
            "INSERT INTO mytable (name, other) VALUES (?, ?)",
            &[Value::from("roobs"), Value::from("dev")],
        )
        .await
        .unwrap();
        let inside = tx.query("SELECT * FROM mytable", &[]).await.unwrap();
        assert_eq!(inside.row_count(), 1);
    }

    let after = conn.query("SELECT * FROM mytable", &[]).await.unwrap();
    assert_eq!(after.row_count(), 0);
}

#[tokio::test]
async fn test_transaction_commit() {
    let conn = setup().await;

    let tx = conn.begin_transaction().await.unwrap();
    tx.execute(
        "INSERT INTO mytable (name, other) VALUES (?, ?)",
        &[Value::from("bb"), Value::from("boss")],
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    let after = conn.query("SELECT * FROM mytable", &[]).await.unwrap();
    assert_eq!(after.row_count(), 1);
}

#[tokio::test]
async fn test_transaction_explicit_rollback() {
    let conn = setup().await;

    let tx = conn.begin_transaction().await.unwrap();
    tx.execute(
        "INSERT INTO mytable (name, other) VALUES (?, ?)",
        &[Value::from("roobs"), Value::from("dev")],
    )
    .await
    .unwrap();
    tx.rollback().await.unwrap();

    let after = conn.query("SELECT * FROM mytable", &[]).await.unwrap();
    assert_eq!(after.row_count(), 0);

    // A fresh transaction can start once the previous one finished
    let tx = conn.begin_transaction().await.unwrap();
    tx.commit().await.unwrap();
}

#[tokio::test]
async fn test_bound_values_are_stored_as_sqlite_types() {
    let conn = setup().await;
    let id = uuid::Uuid::nil();

    let result = conn
        .query(
            "SELECT ? AS flag, ? AS small, ? AS blob, ? AS id, ? AS nothing",
            &[
                Value::Bool(true),
                Value::Int32(7),
                Value::Bytes(vec![1, 2, 3]),
                Value::Uuid(id),
                Value::Null,
            ],
        )
        .await
        .unwrap();

    let row = &result.rows[0];
    assert_eq!(row.get_by_name("flag"), Some(&Value::Int64(1)));
    assert_eq!(row.get_by_name("small"), Some(&Value::Int64(7)));
    assert_eq!(row.get_by_name("blob"), Some(&Value::Bytes(vec![1, 2, 3])));
    assert_eq!(row.get_by_name("id"), Some(&Value::String(id.to_string())));
    assert_eq!(row.get_by_name("nothing"), Some(&Value::Null));
}

#[tokio::test]
async fn test_closed_connection_rejects_statements() {
    let conn = setup().await;
    conn.close().await.unwrap();

    assert!(conn.is_closed());
    assert!(conn.execute("SELECT 1", &[]).await.is_err());
}

#[tokio::test]
async fn test_open_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("batch.db");

    let conn = SqliteConnection::open(path.to_str().unwrap()).unwrap();
    conn.execute_script(SCHEMA).await.unwrap();
    assert_eq!(conn.dialect(), Dialect::Sqlite);
    assert!(path.exists());
}

#[tokio::test]
async fn test_open_missing_parent_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("batch.db");

    assert!(SqliteConnection::open(path.to_str().unwrap()).is_err());
}

#[tokio::test]
async fn test_driver_connect_and_capabilities() {
    let driver = SqliteDriver::new();
    let caps = driver.capabilities();
    assert_eq!(caps.max_parameters, Some(999));
    assert!(caps.supports_concurrent_execution);

    let conn = driver
        .connect(&ConnectionConfig::new_sqlite(":memory:"))
        .await
        .unwrap();
    assert_eq!(conn.driver_name(), "sqlite");

    let missing = driver.connect(&ConnectionConfig::new("sqlite")).await;
    assert!(missing.is_err());
}
