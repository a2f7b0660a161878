//! rowpatch Engine - batch execution and transport commands
//!
//! Coordinates core synthesis and validation with a driver connection:
//! - `executor`: one transaction per batch, per-operation failure accounting
//! - `transaction`: scoped BEGIN/COMMIT/ROLLBACK with guaranteed release
//! - `ipc`: `db_execute` / `db_preview_sql` returning `IpcResponse<T>`

pub mod executor;
pub mod ipc;
pub mod transaction;

pub use executor::{
    execute_batch, execute_batch_with_context, ExecuteOptions, RowCountPolicy, ROW_NOT_FOUND,
};
pub use ipc::{db_execute, db_execute_with_options, db_preview_sql, IpcResponse};
pub use transaction::TransactionScope;
