//! Common fixtures for the SQLite-backed batch tests

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlbatch::{Connection, Value};
use sqlbatch_driver_sqlite::SqliteConnection;

pub const SCHEMA: &str = "CREATE TABLE mytable (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    other TEXT NOT NULL
)";

pub const INSERT_SQL: &str = "INSERT INTO mytable (id, name, other) VALUES %s";

/// A row of `mytable` as read back
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct StoredRow {
    pub id: i64,
    pub name: String,
    pub other: String,
}

impl StoredRow {
    pub fn new(id: i64, name: &str, other: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            other: other.to_string(),
        }
    }
}

pub fn initialize_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("sqlbatch=debug".parse().unwrap())
                    .add_directive("sqlbatch_driver_sqlite=debug".parse().unwrap()),
            )
            .with_test_writer()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Fresh in-memory database with `mytable` created
pub async fn setup() -> Result<Arc<dyn Connection>> {
    initialize_logging();

    let conn = SqliteConnection::open_in_memory().context("open in-memory database")?;
    conn.execute_script(SCHEMA)
        .await
        .context("create schema")?;
    Ok(Arc::new(conn))
}

/// All rows of `mytable` ordered by id
pub async fn fetch_rows(conn: &dyn Connection) -> Result<Vec<StoredRow>> {
    let result = conn
        .query("SELECT id, name, other FROM mytable ORDER BY id", &[])
        .await?;

    result
        .rows
        .iter()
        .map(|row| {
            let id = row.get(0).and_then(Value::as_i64).context("id column")?;
            let name = row.get(1).and_then(Value::as_str).context("name column")?;
            let other = row.get(2).and_then(Value::as_str).context("other column")?;
            Ok(StoredRow::new(id, name, other))
        })
        .collect()
}

/// `(NULL, name, other)` values for one row of `mytable`
pub fn person(name: &str, other: &str) -> [Value; 3] {
    [Value::Null, Value::from(name), Value::from(other)]
}
