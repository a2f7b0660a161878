//! SQLite adapter over rusqlite
//!
//! Values are bound positionally. SQLite has no boolean or JSON storage
//! class, so booleans become integers and structured values JSON text.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::{Number, Value};

use crate::config::ConnectionConfig;
use crate::db;
use crate::driver::{Connector, QueryOutput, SqlConnection};
use crate::errors::{
    connection_closed, connection_error, statement_error, transaction_error, Result,
};
use rowpatch_core::{Dialect, Row};

/// Opens SQLite databases; `database` is the file path or `:memory:`
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector;

#[async_trait]
impl Connector for SqliteConnector {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn SqlConnection>> {
        if config.dialect != Dialect::Sqlite {
            return Err(connection_error(
                &config.target(),
                format!("SQLite connector cannot open a {} database", config.dialect),
            ));
        }

        let conn = if config.database == ":memory:" {
            db::open_in_memory()
        } else {
            db::open(&config.database)
        }
        .map_err(|e| connection_error(&config.target(), e.message()))?;
        db::configure(&conn).map_err(|e| connection_error(&config.target(), e.message()))?;

        tracing::debug!(target_db = %config.target(), "sqlite connection opened");
        Ok(Box::new(SqliteConnection::new(conn)))
    }
}

/// One SQLite connection driven through [`SqlConnection`]
#[derive(Debug)]
pub struct SqliteConnection {
    conn: Option<Connection>,
}

impl SqliteConnection {
    pub fn new(conn: Connection) -> Self {
        Self { conn: Some(conn) }
    }

    fn conn(&self, op: &str) -> Result<&Connection> {
        self.conn.as_ref().ok_or_else(|| connection_closed(op))
    }

    fn control(&self, step: &str, sql: &str) -> Result<()> {
        self.conn(step)?
            .execute_batch(sql)
            .map_err(|e| transaction_error(step, e))
    }
}

#[async_trait]
impl SqlConnection for SqliteConnection {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<QueryOutput> {
        let conn = self.conn("execute")?;
        let bound: Vec<SqliteValue> = params.iter().map(to_sqlite).collect();

        let mut stmt = conn.prepare(sql).map_err(statement_error)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        if columns.is_empty() {
            let affected = stmt
                .execute(params_from_iter(bound.iter()))
                .map_err(statement_error)?;
            return Ok(QueryOutput {
                rows: Vec::new(),
                row_count: affected as u64,
            });
        }

        let mut rows = Vec::new();
        let mut cursor = stmt
            .query(params_from_iter(bound.iter()))
            .map_err(statement_error)?;
        while let Some(source) = cursor.next().map_err(statement_error)? {
            let mut row = Row::new();
            for (i, name) in columns.iter().enumerate() {
                let value = source.get_ref(i).map_err(statement_error)?;
                row.insert(name.clone(), from_sqlite(value));
            }
            rows.push(row);
        }

        Ok(QueryOutput {
            row_count: rows.len() as u64,
            rows,
        })
    }

    async fn begin(&mut self) -> Result<()> {
        self.control("begin", "BEGIN")
    }

    async fn commit(&mut self) -> Result<()> {
        self.control("commit", "COMMIT")
    }

    async fn rollback(&mut self) -> Result<()> {
        self.control("rollback", "ROLLBACK")
    }

    async fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| connection_error("sqlite", e)),
            None => Ok(()),
        }
    }
}

/// Map a JSON value onto a SQLite storage class
pub fn to_sqlite(value: &Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Bool(b) => SqliteValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqliteValue::Integer(i),
            None => SqliteValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqliteValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqliteValue::Text(value.to_string()),
    }
}

/// Map a SQLite column value back to JSON
pub fn from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}
