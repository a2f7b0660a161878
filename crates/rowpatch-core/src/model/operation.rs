//! Edit operations and batches
//!
//! Operations are a tagged enum on the wire:
//! `{"type": "update", "id": ..., "primaryKeys": [...], ...}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::context::{EditContext, Row};

/// A primary-key column and the value identifying the row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryKeyValue {
    pub column: String,
    pub value: Value,
    pub data_type: String,
}

/// One changed column of an updated row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnChange {
    pub column: String,
    pub old_value: Value,
    pub new_value: Value,
    pub data_type: String,
}

/// A single row mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditOperation {
    #[serde(rename_all = "camelCase")]
    Update {
        id: String,
        primary_keys: Vec<PrimaryKeyValue>,
        changes: Vec<ColumnChange>,
        original_row: Row,
    },
    #[serde(rename_all = "camelCase")]
    Insert {
        id: String,
        values: Row,
        /// Column order of the INSERT statement
        columns: Vec<String>,
        /// Declared type per column; absent columns are treated as `text`
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        data_types: BTreeMap<String, String>,
    },
    #[serde(rename_all = "camelCase")]
    Delete {
        id: String,
        primary_keys: Vec<PrimaryKeyValue>,
        original_row: Row,
    },
}

/// Discriminant of an [`EditOperation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Update,
    Insert,
    Delete,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Update => "update",
            OperationKind::Insert => "insert",
            OperationKind::Delete => "delete",
        }
    }
}

impl EditOperation {
    pub fn id(&self) -> &str {
        match self {
            EditOperation::Update { id, .. }
            | EditOperation::Insert { id, .. }
            | EditOperation::Delete { id, .. } => id,
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            EditOperation::Update { .. } => OperationKind::Update,
            EditOperation::Insert { .. } => OperationKind::Insert,
            EditOperation::Delete { .. } => OperationKind::Delete,
        }
    }

    /// Row identity of an Update or Delete; empty for Inserts
    pub fn primary_keys(&self) -> &[PrimaryKeyValue] {
        match self {
            EditOperation::Update { primary_keys, .. }
            | EditOperation::Delete { primary_keys, .. } => primary_keys,
            EditOperation::Insert { .. } => &[],
        }
    }
}

/// All row mutations for one atomic commit against one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditBatch {
    pub context: EditContext,
    pub operations: Vec<EditOperation>,
}

impl EditBatch {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Count operations of one kind
    pub fn count(&self, kind: OperationKind) -> usize {
        self.operations.iter().filter(|op| op.kind() == kind).count()
    }
}
