//! Outcome of executing an edit batch

use serde::{Deserialize, Serialize};

/// SQL text attributed to one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutedStatement {
    pub operation_id: String,
    pub sql: String,
}

/// A per-operation failure (validation or statement execution)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationError {
    pub operation_id: String,
    pub message: String,
}

/// Result of committing (or rolling back) one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    pub success: bool,
    pub rows_affected: u64,
    pub executed_sql: Vec<ExecutedStatement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<OperationError>>,
}

impl EditResult {
    /// Errors recorded for the batch, empty on success
    pub fn errors(&self) -> &[OperationError] {
        self.errors.as_deref().unwrap_or(&[])
    }

    /// Whether the given operation failed
    pub fn failed(&self, operation_id: &str) -> bool {
        self.errors().iter().any(|e| e.operation_id == operation_id)
    }
}
