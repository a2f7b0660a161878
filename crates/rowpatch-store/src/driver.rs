//! Driver-level interface the executor talks to
//!
//! The executor only needs to run statements with positional parameters and
//! drive one transaction. Connection pooling, credential storage and
//! introspection live elsewhere.

use async_trait::async_trait;
use rowpatch_core::{Dialect, Row};
use serde_json::Value;

use crate::config::ConnectionConfig;
use crate::errors::Result;

/// Outcome of one statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    /// Result rows, empty for DML
    pub rows: Vec<Row>,
    /// Rows affected (DML) or returned (queries)
    pub row_count: u64,
}

/// One open database connection
///
/// Errors from `execute` should use `StatementExecution` for anything the
/// database rejected and `Connection` when the connection itself is gone.
#[async_trait]
pub trait SqlConnection: Send {
    fn dialect(&self) -> Dialect;

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<QueryOutput>;

    async fn begin(&mut self) -> Result<()>;

    async fn commit(&mut self) -> Result<()>;

    async fn rollback(&mut self) -> Result<()>;

    /// Release the connection; further calls fail with a `Connection` error
    async fn close(&mut self) -> Result<()>;
}

/// Opens connections from configuration
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, config: &ConnectionConfig) -> Result<Box<dyn SqlConnection>>;
}
