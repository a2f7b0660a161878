//! Transactional batch execution
//!
//! One connection and one transaction per batch. Operations run strictly in
//! batch order. Per-operation failures (validation, rejected statements,
//! unmatched rows) are collected and decide between COMMIT and ROLLBACK.
//! Connection and transaction-control failures abort the batch and are
//! returned as errors.
//!
//! ## Logging Ownership
//!
//! This module owns lifecycle logging for batch execution:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success (including a rolled-back batch)
//! - `log_op_error!` on fatal failure
//!
//! The store and core layers only use `tracing::debug!()`.

#![allow(clippy::result_large_err)]

use rowpatch_core::{
    build_query, log_op_end, log_op_error, log_op_start, validate_operation, EditBatch,
    EditOperation, EditResult, ExecutedStatement, OperationError, OperationKind,
};
use rowpatch_core_types::RequestContext;
use rowpatch_store::errors::Result;
use rowpatch_store::{ConnectionConfig, Connector};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::transaction::TransactionScope;

/// Message recorded when an Update or Delete matched no row
pub const ROW_NOT_FOUND: &str = "Row not found: no row matched the primary key";

/// What to do when an Update or Delete affects zero rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowCountPolicy {
    /// Count it as success
    Ignore,
    /// Record a per-operation error, which rolls the batch back
    #[default]
    RequireMatch,
}

/// Knobs for one execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecuteOptions {
    pub row_count_policy: RowCountPolicy,
    /// Run every statement, then roll back regardless of the outcome
    pub dry_run: bool,
}

/// Execute a batch with default options and a fresh request context
///
/// # Errors
///
/// Returns `Connection` or `TransactionControl` errors when the batch could
/// not be run to a commit or rollback. Per-operation failures are reported
/// inside the returned [`EditResult`].
pub async fn execute_batch(
    connector: &dyn Connector,
    config: &ConnectionConfig,
    batch: &EditBatch,
    options: ExecuteOptions,
) -> Result<EditResult> {
    execute_batch_with_context(connector, config, batch, options, &RequestContext::new()).await
}

/// Execute a batch, tagging logs and errors with the caller's request context
///
/// # Errors
///
/// See [`execute_batch`].
pub async fn execute_batch_with_context(
    connector: &dyn Connector,
    config: &ConnectionConfig,
    batch: &EditBatch,
    options: ExecuteOptions,
    ctx: &RequestContext,
) -> Result<EditResult> {
    let table = batch.context.qualified_name();
    log_op_start!(
        "execute_batch",
        request_id = ctx.request_id.as_str(),
        table = table.as_str(),
        operation_count = batch.len() as u64,
        dry_run = options.dry_run
    );
    let start = Instant::now();

    let result = execute_batch_impl(connector, config, batch, options)
        .await
        .map_err(|e| {
            let e = e.with_request_id(ctx.request_id.clone());
            log_op_error!(
                "execute_batch",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id.as_str()
            );
            e
        })?;

    log_op_end!(
        "execute_batch",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = ctx.request_id.as_str(),
        success = result.success,
        rows_affected = result.rows_affected,
        error_count = result.errors().len() as u64
    );

    Ok(result)
}

async fn execute_batch_impl(
    connector: &dyn Connector,
    config: &ConnectionConfig,
    batch: &EditBatch,
    options: ExecuteOptions,
) -> Result<EditResult> {
    let conn = connector.connect(config).await?;
    let mut scope = TransactionScope::begin(conn).await?;
    let dialect = scope.connection().dialect();

    let mut rows_affected = 0u64;
    let mut executed_sql = Vec::new();
    let mut errors = Vec::new();

    for op in &batch.operations {
        let outcome = validate_operation(op);
        if !outcome.valid {
            tracing::debug!(operation_id = op.id(), "operation failed validation");
            errors.push(OperationError {
                operation_id: op.id().to_string(),
                message: outcome
                    .error
                    .unwrap_or_else(|| "Invalid operation".to_string()),
            });
            continue;
        }

        let query = build_query(op, &batch.context, &dialect);
        match scope.connection().execute(&query.sql, &query.params).await {
            Ok(output) => {
                if requires_match(op, options.row_count_policy) && output.row_count == 0 {
                    errors.push(OperationError {
                        operation_id: op.id().to_string(),
                        message: ROW_NOT_FOUND.to_string(),
                    });
                    continue;
                }
                rows_affected += output.row_count;
                executed_sql.push(ExecutedStatement {
                    operation_id: op.id().to_string(),
                    sql: query.sql,
                });
            }
            Err(e) if e.kind().is_fatal_to_batch() => {
                return Err(scope.abort(e.with_operation_id(op.id())).await);
            }
            Err(e) => {
                tracing::debug!(operation_id = op.id(), error = %e, "statement rejected");
                errors.push(OperationError {
                    operation_id: op.id().to_string(),
                    message: e.message().to_string(),
                });
            }
        }
    }

    let success = errors.is_empty();
    if success && !options.dry_run {
        scope.commit().await?;
    } else {
        scope.rollback().await?;
    }

    Ok(EditResult {
        success,
        // Nothing persisted when the batch was rolled back for errors
        rows_affected: if success { rows_affected } else { 0 },
        executed_sql,
        errors: if success { None } else { Some(errors) },
    })
}

fn requires_match(op: &EditOperation, policy: RowCountPolicy) -> bool {
    policy == RowCountPolicy::RequireMatch && op.kind() != OperationKind::Insert
}
