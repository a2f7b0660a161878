//! rowpatch Core - edit tracking and SQL synthesis
//!
//! This crate provides the in-memory half of the grid editing pipeline:
//! - Edit sessions: sparse diff of modified cells, deletion marks, new-row drafts
//! - Batch building: diff + column metadata -> ordered `EditBatch`
//! - Operation validation
//! - SQL synthesis for PostgreSQL, MySQL and SQLite, parameterized or preview
//! - The error and logging facilities shared by the other crates
//!
//! Nothing here performs I/O; execution lives in `rowpatch-engine`.

pub mod batch;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod session;
pub mod sql;
pub mod validate;

// Used by the logging macros
pub use rowpatch_core_types as core_types;
#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use batch::build_edit_batch;
pub use errors::{EditError, ExError, ExErrorKind, Result};
pub use model::{
    ColumnChange, ColumnInfo, EditBatch, EditContext, EditOperation, EditResult,
    ExecutedStatement, OperationError, OperationKind, PrimaryKeyValue, Row,
};
pub use session::{EditSessionState, PendingChanges, SessionEvent, SessionRegistry};
pub use sql::{build_preview_sql, build_query, preview_batch, BuiltQuery, Dialect, SqlDialect};
pub use validate::{validate_operation, ValidationOutcome};
