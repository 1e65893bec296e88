//! SQLite connection implementation

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{Connection as RusqliteConnection, OpenFlags, ToSql, params_from_iter};
use sqlbatch_core::{
    Connection, Dialect, Error, QueryResult, Result, Row, StatementResult, Transaction, Value,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// SQLite connection wrapper
///
/// The underlying rusqlite connection sits behind a mutex, so a single
/// `SqliteConnection` can be shared by several batch workers. Their statements
/// are serialized on the connection.
pub struct SqliteConnection {
    conn: Arc<Mutex<RusqliteConnection>>,
    closed: AtomicBool,
}

impl SqliteConnection {
    /// Open a SQLite database
    ///
    /// `path` may be `:memory:`, a `file:` URI, or a filesystem path
    /// (`~/` is expanded, relative paths are resolved against the current
    /// directory).
    pub fn open(path: &str) -> Result<Self> {
        tracing::info!(path = %path, "opening SQLite database");
        let expanded_path = Self::expand_path(path)?;

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = if path == ":memory:" {
            RusqliteConnection::open_in_memory().map_err(|e| {
                Error::Connection(format!("Failed to open in-memory database: {}", e))
            })?
        } else {
            if !expanded_path.starts_with("file:") {
                let file_path = std::path::Path::new(&expanded_path);
                if let Some(parent) = file_path.parent()
                    && !parent.exists()
                {
                    return Err(Error::Connection(format!(
                        "Parent directory does not exist: {}",
                        parent.display()
                    )));
                }
            }

            RusqliteConnection::open_with_flags(&expanded_path, flags).map_err(|e| {
                Error::Connection(format!(
                    "Failed to open SQLite database at '{}': {}",
                    expanded_path, e
                ))
            })?
        };

        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| Error::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| Error::Connection(format!("Failed to set journal mode: {}", e)))?;

        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| Error::Connection(format!("Failed to set synchronous mode: {}", e)))?;

        tracing::info!(path = %expanded_path, "SQLite database connection established");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            closed: AtomicBool::new(false),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Expand path to handle ~ (home directory) and relative paths
    fn expand_path(path: &str) -> Result<String> {
        if path == ":memory:" || path.starts_with("file:") {
            return Ok(path.to_string());
        }

        let expanded = if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = std::env::var_os("HOME") {
                let home_path = std::path::PathBuf::from(home);
                home_path.join(rest).to_string_lossy().to_string()
            } else {
                return Err(Error::Configuration(
                    "Unable to determine HOME directory".into(),
                ));
            }
        } else if path.starts_with('~') {
            return Err(Error::Configuration(
                "User-specific home directories (~user) are not supported".into(),
            ));
        } else {
            path.to_string()
        };

        let path_buf = std::path::PathBuf::from(&expanded);
        let result = if path_buf.is_relative() {
            std::env::current_dir()
                .map_err(Error::Io)?
                .join(path_buf)
                .to_string_lossy()
                .to_string()
        } else {
            expanded
        };

        Ok(result)
    }

    /// Execute a script of one or more statements without parameters
    ///
    /// Intended for schema setup; no per-statement results are reported.
    pub async fn execute_script(&self, sql: &str) -> Result<()> {
        tracing::debug!("executing SQL script");
        let conn = self.conn.lock();
        conn.execute_batch(sql)
            .map_err(|e| Error::Query(format!("Failed to execute script: {}", e)))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Connection("Connection is closed".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Connection for SqliteConnection {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>(), params = params.len()))]
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult> {
        self.ensure_open()?;
        let conn = self.conn.lock();
        execute_on(&conn, sql, params)
    }

    #[tracing::instrument(skip(self, sql, params), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        self.ensure_open()?;
        let conn = self.conn.lock();
        query_on(&conn, sql, params)
    }

    async fn begin_transaction(&self) -> Result<Box<dyn Transaction>> {
        self.ensure_open()?;
        tracing::debug!("beginning SQLite transaction");
        {
            let conn = self.conn.lock();
            // DEFERRED: the write lock is taken on the first write
            conn.execute_batch("BEGIN DEFERRED")
                .map_err(|e| Error::Query(format!("Failed to begin transaction: {}", e)))?;
        }
        Ok(Box::new(SqliteTransaction {
            conn: Some(Arc::clone(&self.conn)),
        }))
    }

    async fn close(&self) -> Result<()> {
        tracing::info!("closing SQLite connection");
        self.closed.store(true, Ordering::Release);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Transaction driven by raw `BEGIN DEFERRED` / `COMMIT` / `ROLLBACK` SQL on
/// the shared connection.
///
/// `conn` is taken when the transaction is finished; a transaction dropped
/// while still holding it is rolled back.
pub struct SqliteTransaction {
    conn: Option<Arc<Mutex<RusqliteConnection>>>,
}

impl SqliteTransaction {
    fn conn(&self) -> Result<&Arc<Mutex<RusqliteConnection>>> {
        self.conn
            .as_ref()
            .ok_or_else(|| Error::Query("Transaction is already finished".into()))
    }

    /// Issue `COMMIT` or `ROLLBACK`, releasing the connection either way
    fn finish(&mut self, command: &'static str) -> Result<()> {
        let Some(conn) = self.conn.take() else {
            return Err(Error::Query("Transaction is already finished".into()));
        };
        let guard = conn.lock();
        guard
            .execute_batch(command)
            .map_err(|e| Error::Query(format!("{} failed: {}", command, e)))
    }
}

impl Drop for SqliteTransaction {
    fn drop(&mut self) {
        if self.conn.is_none() {
            return;
        }
        tracing::warn!("SQLite transaction dropped while open, rolling back");
        if let Err(e) = self.finish("ROLLBACK") {
            tracing::error!(error = %e, "automatic rollback on drop failed");
        }
    }
}

#[async_trait]
impl Transaction for SqliteTransaction {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn commit(mut self: Box<Self>) -> Result<()> {
        tracing::debug!("committing SQLite transaction");
        self.finish("COMMIT")
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        tracing::debug!("rolling back SQLite transaction");
        self.finish("ROLLBACK")
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        tracing::debug!(sql_preview = %sql.chars().take(100).collect::<String>(), "executing query in SQLite transaction");
        let conn = self.conn()?.lock();
        query_on(&conn, sql, params)
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<StatementResult> {
        tracing::debug!(sql_preview = %sql.chars().take(100).collect::<String>(), params = params.len(), "executing statement in SQLite transaction");
        let conn = self.conn()?.lock();
        execute_on(&conn, sql, params)
    }
}

fn execute_on(conn: &RusqliteConnection, sql: &str, params: &[Value]) -> Result<StatementResult> {
    let rows_affected = conn
        .execute(sql, params_from_iter(bind_all(params)))
        .map_err(|e| Error::Query(format!("Failed to execute statement: {}", e)))?;

    tracing::debug!(affected_rows = rows_affected, "statement executed");
    Ok(StatementResult {
        affected_rows: rows_affected as u64,
    })
}

fn query_on(conn: &RusqliteConnection, sql: &str, params: &[Value]) -> Result<QueryResult> {
    let start_time = std::time::Instant::now();

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| Error::Query(format!("Failed to prepare query: {}", e)))?;

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows = Vec::new();
    let mut query_rows = stmt
        .query(params_from_iter(bind_all(params)))
        .map_err(|e| Error::Query(format!("Failed to execute query: {}", e)))?;

    while let Some(row) = query_rows
        .next()
        .map_err(|e| Error::Query(format!("Failed to fetch row: {}", e)))?
    {
        let mut values = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            values.push(rusqlite_to_value(row, i)?);
        }
        rows.push(Row::new(columns.clone(), values));
    }

    let execution_time_ms = start_time.elapsed().as_millis() as u64;
    tracing::debug!(
        row_count = rows.len(),
        execution_time_ms = execution_time_ms,
        "query executed successfully"
    );
    Ok(QueryResult {
        id: uuid::Uuid::new_v4(),
        columns,
        rows,
        execution_time_ms,
    })
}

/// Borrowed view of a `Value` bound as a positional parameter
struct Bind<'a>(&'a Value);

impl ToSql for Bind<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let output = match self.0 {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Bool(b) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*b))),
            Value::Int32(i) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*i))),
            Value::Int64(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            Value::Float64(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            Value::Decimal(s) | Value::String(s) => {
                ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes()))
            }
            Value::Bytes(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            Value::DateTimeUtc(dt) => ToSqlOutput::Owned(SqlValue::Text(dt.to_rfc3339())),
            other @ (Value::Date(_)
            | Value::Time(_)
            | Value::DateTime(_)
            | Value::Json(_)
            | Value::Uuid(_)) => ToSqlOutput::Owned(SqlValue::Text(other.to_string())),
        };
        Ok(output)
    }
}

fn bind_all(values: &[Value]) -> impl Iterator<Item = Bind<'_>> {
    values.iter().map(Bind)
}

/// Convert rusqlite row value to our Value type
fn rusqlite_to_value(row: &rusqlite::Row, idx: usize) -> Result<Value> {
    let value_ref = row.get_ref(idx).map_err(|e| Error::Query(e.to_string()))?;

    let value = match value_ref {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        ValueRef::Text(s) => Value::String(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    };

    Ok(value)
}
