//! Error handling for rowpatch-store
//!
//! Wraps rowpatch-core ExError with driver-specific helpers. The kind
//! chosen here decides whether the executor treats a failure as local to
//! one operation or fatal to the whole batch.

use rowpatch_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Failure to open or reach the database
pub fn connection_error(target: &str, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Connection)
        .with_op("connect")
        .with_message(format!("Cannot connect to {}: {}", target, reason))
}

/// A statement the database rejected (constraint, syntax, type)
pub fn statement_error(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::StatementExecution)
        .with_op("execute")
        .with_message(err.to_string())
}

/// BEGIN, COMMIT or ROLLBACK failed
pub fn transaction_error(step: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::TransactionControl)
        .with_op(step.to_string())
        .with_message(format!("{} failed: {}", step.to_uppercase(), err))
}

/// The connection was already closed
pub fn connection_closed(op: &str) -> ExError {
    ExError::new(ExErrorKind::Connection)
        .with_op(op.to_string())
        .with_message("Connection is closed")
}

/// Invalid or unreadable connection configuration
pub fn config_error(reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_config")
        .with_message(reason)
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_split_fatal_from_local() {
        let stmt = statement_error(rusqlite::Error::InvalidQuery);
        assert!(!stmt.kind().is_fatal_to_batch());

        let tx = transaction_error("commit", rusqlite::Error::InvalidQuery);
        assert!(tx.kind().is_fatal_to_batch());
        assert!(tx.message().starts_with("COMMIT failed"));

        assert!(connection_closed("execute").kind().is_fatal_to_batch());
    }
}
