//! SQLite store implementation.
//!
//! Provides the `SqliteStore` struct that implements the `Store` trait using
//! sqlx. Every session is a fresh `SqliteConnection`; nothing is pooled.

use crate::config::DatabaseConfig;
use crate::db::statements::count_statements;
use crate::db::{Row, Session, StatementResult, Store, Value};
use crate::error::{MenuError, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{
    Column as SqlxColumn, ConnectOptions, Connection, Executor, Row as SqlxRow, Statement,
    TypeInfo, ValueRef,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// SQLite store backed by a database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl SqliteStore {
    /// Creates a store for the database file named in the configuration.
    ///
    /// No connection is made until a session is opened.
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(config.create_if_missing)
            .disable_statement_logging();

        Self {
            path: config.path.clone(),
            options,
        }
    }

    /// Returns the path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn open(&self) -> Result<Box<dyn Session>> {
        let conn = self.options.connect().await.map_err(|e| {
            MenuError::connection(format!("Cannot open {}: {e}", self.path.display()))
        })?;

        debug!("Opened session on {}", self.path.display());
        Ok(Box::new(SqliteSession { conn }))
    }
}

/// Message SQLite's own drivers use when handed more than one statement.
const MULTIPLE_STATEMENTS: &str = "You can only execute one statement at a time.";

/// A single SQLite connection, alive for one tool call.
///
/// Statements run in autocommit mode, so a statement that completes is
/// durable and a statement that fails leaves nothing behind.
struct SqliteSession {
    conn: SqliteConnection,
}

#[async_trait]
impl Session for SqliteSession {
    async fn execute(&mut self, sql: &str) -> Result<StatementResult> {
        // Checked before anything runs, so a trailing statement can never
        // take effect behind a result set.
        if count_statements(sql).is_some_and(|n| n > 1) {
            return Err(MenuError::query(MULTIPLE_STATEMENTS));
        }

        let statement = self
            .conn
            .prepare(sql)
            .await
            .map_err(|e| MenuError::query(format_query_error(e)))?;

        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        if columns.is_empty() {
            statement
                .query()
                .execute(&mut self.conn)
                .await
                .map_err(|e| MenuError::query(format_query_error(e)))?;
            return Ok(StatementResult::no_result());
        }

        let rows = statement
            .query()
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| MenuError::query(format_query_error(e)))?;

        let rows = rows.iter().map(convert_row).collect::<Result<Vec<Row>>>()?;
        Ok(StatementResult::with_data(columns, rows))
    }

    async fn commit(&mut self) -> Result<()> {
        if !self.conn.is_in_transaction() {
            return Ok(());
        }

        self.conn
            .execute("COMMIT")
            .await
            .map(|_| ())
            .map_err(|e| MenuError::query(format_query_error(e)))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let session = *self;
        session
            .conn
            .close()
            .await
            .map_err(|e| MenuError::connection(format!("Failed to close session: {e}")))
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Result<Row> {
    (0..row.len()).map(|i| convert_value(row, i)).collect()
}

/// Converts a single column value using the storage class SQLite reports for it.
///
/// SQLite is dynamically typed, so the runtime type of the value wins over the
/// declared column type.
fn convert_value(row: &SqliteRow, index: usize) -> Result<Value> {
    let type_name = {
        let raw = row
            .try_get_raw(index)
            .map_err(|e| MenuError::query(format!("Failed to read column {index}: {e}")))?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        raw.type_info().name().to_uppercase()
    };

    let decoded = match type_name.as_str() {
        "INTEGER" | "INT" | "INT8" | "BIGINT" => {
            row.try_get_unchecked::<i64, _>(index).map(Value::Int)
        }
        "REAL" | "FLOAT" | "DOUBLE" => row.try_get_unchecked::<f64, _>(index).map(Value::Float),
        "BOOLEAN" | "BOOL" => row.try_get_unchecked::<bool, _>(index).map(Value::Bool),
        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Value::Bytes),
        _ => row
            .try_get_unchecked::<String, _>(index)
            .map(Value::String),
    };

    decoded.map_err(|e| {
        MenuError::query(format!(
            "Failed to decode {type_name} value in column {index}: {e}"
        ))
    })
}

/// Formats a store error, keeping SQLite's own message when there is one.
fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => match db_error.code() {
            Some(code) => format!("{} (code {code})", db_error.message()),
            None => db_error.message().to_string(),
        },
        None => error.to_string(),
    }
}
