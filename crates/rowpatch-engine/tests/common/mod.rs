#![allow(dead_code)]

use async_trait::async_trait;
use rowpatch_core::errors::{ExError, ExErrorKind};
use rowpatch_core::{ColumnInfo, Dialect, EditContext, Row};
use rowpatch_store::errors::Result;
use rowpatch_store::{ConnectionConfig, Connector, QueryOutput, SqlConnection};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A SQLite database file with a `users` table holding Alice and Bob
pub fn setup_db() -> (TempDir, ConnectionConfig) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let conn = Connection::open(&db_path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            prefs TEXT
        );
        INSERT INTO users (id, name, email) VALUES (1, 'Alice', 'a@x.com');
        INSERT INTO users (id, name, email) VALUES (2, 'Bob', 'b@x.com');
        "#,
    )
    .unwrap();
    let config = ConnectionConfig::sqlite("test", &db_path);
    (temp_dir, config)
}

/// Read the whole `users` table ordered by id
pub fn read_users(config: &ConnectionConfig) -> Vec<(i64, String, String)> {
    let conn = Connection::open(&config.database).unwrap();
    let mut stmt = conn
        .prepare("SELECT id, name, email FROM users ORDER BY id")
        .unwrap();
    let rows = stmt
        .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
        .unwrap();
    rows.map(|r| r.unwrap()).collect()
}

pub fn users_context() -> EditContext {
    EditContext::new("", "users", vec!["id".to_string()])
}

pub fn users_columns() -> Vec<ColumnInfo> {
    vec![
        ColumnInfo::new("id", "integer", 1).primary_key(),
        ColumnInfo::new("name", "text", 2),
        ColumnInfo::new("email", "text", 3),
        ColumnInfo::new("prefs", "json", 4),
    ]
}

pub fn user_row(id: i64, name: &str, email: &str) -> Row {
    let mut row = Row::new();
    row.insert("id".to_string(), json!(id));
    row.insert("name".to_string(), json!(name));
    row.insert("email".to_string(), json!(email));
    row.insert("prefs".to_string(), Value::Null);
    row
}

/// Which transaction step a [`FaultyConnector`] should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Connect,
    Begin,
    Execute,
    Commit,
    Rollback,
}

/// Connector whose connections record every call and fail at one step
#[derive(Clone)]
pub struct FaultyConnector {
    pub fault: Fault,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FaultyConnector {
    pub fn new(fault: Fault) -> Self {
        Self {
            fault,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for FaultyConnector {
    async fn connect(&self, _config: &ConnectionConfig) -> Result<Box<dyn SqlConnection>> {
        if self.fault == Fault::Connect {
            return Err(ExError::new(ExErrorKind::Connection).with_message("connection refused"));
        }
        Ok(Box::new(FaultyConnection {
            fault: self.fault,
            calls: self.calls.clone(),
        }))
    }
}

struct FaultyConnection {
    fault: Fault,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FaultyConnection {
    fn step(&self, name: &str, fault: Fault, kind: ExErrorKind) -> Result<()> {
        self.calls.lock().unwrap().push(name.to_string());
        if self.fault == fault {
            return Err(ExError::new(kind).with_message(format!("{} failed", name)));
        }
        Ok(())
    }
}

#[async_trait]
impl SqlConnection for FaultyConnection {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn execute(&mut self, _sql: &str, _params: &[Value]) -> Result<QueryOutput> {
        self.step("execute", Fault::Execute, ExErrorKind::Connection)?;
        Ok(QueryOutput {
            rows: Vec::new(),
            row_count: 1,
        })
    }

    async fn begin(&mut self) -> Result<()> {
        self.step("begin", Fault::Begin, ExErrorKind::TransactionControl)
    }

    async fn commit(&mut self) -> Result<()> {
        self.step("commit", Fault::Commit, ExErrorKind::TransactionControl)
    }

    async fn rollback(&mut self) -> Result<()> {
        self.step("rollback", Fault::Rollback, ExErrorKind::TransactionControl)
    }

    async fn close(&mut self) -> Result<()> {
        self.calls.lock().unwrap().push("close".to_string());
        Ok(())
    }
}
