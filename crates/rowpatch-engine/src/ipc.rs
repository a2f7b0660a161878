//! Transport commands exposed to the UI process
//!
//! Every command answers with an [`IpcResponse`]; errors never cross the
//! boundary as anything but a message.

use rowpatch_core::{
    log_op_end, log_op_error, log_op_start, preview_batch, Dialect, EditBatch, EditResult,
    ExError, ExecutedStatement,
};
use rowpatch_store::{ConnectionConfig, Connector};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::executor::{execute_batch, ExecuteOptions};

/// Envelope returned by every transport command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpcResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> IpcResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<ExError> for IpcResponse<T> {
    fn from(err: ExError) -> Self {
        Self::err(err.to_string())
    }
}

/// Execute a batch against the configured database
///
/// A batch that ran but rolled back is still a successful command:
/// `data.success` is `false` and `data.errors` lists the failed operations.
pub async fn db_execute(
    connector: &dyn Connector,
    config: &ConnectionConfig,
    batch: &EditBatch,
) -> IpcResponse<EditResult> {
    db_execute_with_options(connector, config, batch, ExecuteOptions::default()).await
}

/// [`db_execute`] with explicit execution options
pub async fn db_execute_with_options(
    connector: &dyn Connector,
    config: &ConnectionConfig,
    batch: &EditBatch,
    options: ExecuteOptions,
) -> IpcResponse<EditResult> {
    match execute_batch(connector, config, batch, options).await {
        Ok(result) => IpcResponse::ok(result),
        Err(e) => e.into(),
    }
}

/// Render the statements a batch would run, with literals inlined
///
/// Display only; the output is never executed.
pub fn db_preview_sql(batch: &EditBatch, dialect: Dialect) -> IpcResponse<Vec<ExecutedStatement>> {
    log_op_start!(
        "db_preview_sql",
        dialect = dialect.as_str(),
        operation_count = batch.len() as u64
    );
    let start = Instant::now();

    if batch.context.table.is_empty() {
        let err = ExError::new(rowpatch_core::ExErrorKind::InvalidInput)
            .with_op("db_preview_sql")
            .with_message("Batch has no target table");
        log_op_error!(
            "db_preview_sql",
            err.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        return err.into();
    }

    let statements = preview_batch(batch, &dialect);
    log_op_end!(
        "db_preview_sql",
        duration_ms = start.elapsed().as_millis() as u64
    );
    IpcResponse::ok(statements)
}
