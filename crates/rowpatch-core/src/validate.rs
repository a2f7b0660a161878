//! Structural pre-flight checks on a single edit operation
//!
//! Failing operations are not fatal: the executor skips them, records the
//! message against the operation id, and keeps going.

use serde::{Deserialize, Serialize};

use crate::errors::EditError;
use crate::model::{EditOperation, PrimaryKeyValue};

/// Outcome of validating one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(reason.into()),
        }
    }

    /// Convert into a typed error for callers that propagate with `?`
    pub fn into_result(self, operation_id: &str) -> Result<(), EditError> {
        match self.error {
            Some(reason) if !self.valid => Err(EditError::InvalidOperation {
                operation_id: operation_id.to_string(),
                reason,
            }),
            _ => Ok(()),
        }
    }
}

/// Check that an operation can be turned into a well-formed statement
pub fn validate_operation(op: &EditOperation) -> ValidationOutcome {
    match op {
        EditOperation::Update {
            primary_keys,
            changes,
            ..
        } => {
            if let Some(reason) = check_primary_keys(primary_keys) {
                return ValidationOutcome::invalid(format!("Update {}", reason));
            }
            if changes.is_empty() {
                return ValidationOutcome::invalid("Update has no changed columns");
            }
            if changes.iter().any(|c| c.column.is_empty()) {
                return ValidationOutcome::invalid("Update changes a column with an empty name");
            }
            ValidationOutcome::ok()
        }
        EditOperation::Delete { primary_keys, .. } => match check_primary_keys(primary_keys) {
            Some(reason) => ValidationOutcome::invalid(format!("Delete {}", reason)),
            None => ValidationOutcome::ok(),
        },
        EditOperation::Insert { values, .. } => {
            if values.is_empty() {
                ValidationOutcome::invalid("Insert has no values")
            } else {
                ValidationOutcome::ok()
            }
        }
    }
}

fn check_primary_keys(primary_keys: &[PrimaryKeyValue]) -> Option<&'static str> {
    if primary_keys.is_empty() {
        return Some("requires at least one primary key value");
    }
    if primary_keys.iter().any(|pk| pk.column.is_empty()) {
        return Some("has a primary key with an empty column name");
    }
    // A key column missing from the snapshot surfaces as null; null never identifies a row
    if primary_keys.iter().any(|pk| pk.value.is_null()) {
        return Some("has a primary key column without a value");
    }
    None
}
