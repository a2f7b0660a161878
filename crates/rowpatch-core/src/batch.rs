//! Batch construction
//!
//! Turns a session's sparse diff into an ordered [`EditBatch`]:
//! Updates (ascending row), then Deletes (ascending row), then Inserts
//! (draft order). Rows marked for deletion never produce an Update.
//!
//! Row identity always comes from the snapshot taken when the row was first
//! touched, so editing a primary-key column updates the row that was fetched.

use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use crate::model::{
    ColumnChange, ColumnInfo, EditBatch, EditContext, EditOperation, OperationKind,
    PrimaryKeyValue, Row,
};
use crate::session::EditSessionState;

/// Type used for columns missing from the introspection metadata
pub const DEFAULT_DATA_TYPE: &str = "text";

/// Build the batch for a session, or `None` when there is nothing to commit
///
/// Two calls on the same unmodified state return equal batches: Update and
/// Delete ids are UUIDv5 over session id, kind and row index, Inserts reuse
/// the draft id.
pub fn build_edit_batch(
    state: &EditSessionState,
    context: &EditContext,
    columns: &[ColumnInfo],
) -> Option<EditBatch> {
    let mut operations = Vec::new();

    for (row_index, changes) in &state.modified {
        if state.deleted.contains(row_index) || changes.is_empty() {
            continue;
        }
        let Some(snapshot) = state.snapshots.get(row_index) else {
            tracing::debug!(row_index, "modified row without snapshot skipped");
            continue;
        };

        let changes = changes
            .iter()
            .map(|(column, new_value)| ColumnChange {
                column: column.clone(),
                old_value: snapshot.get(column).cloned().unwrap_or(Value::Null),
                new_value: new_value.clone(),
                data_type: data_type_of(columns, column),
            })
            .collect();

        operations.push(EditOperation::Update {
            id: operation_id(state.id(), OperationKind::Update, *row_index),
            primary_keys: primary_keys_from(snapshot, context, columns),
            changes,
            original_row: snapshot.clone(),
        });
    }

    for row_index in &state.deleted {
        let Some(snapshot) = state.snapshots.get(row_index) else {
            tracing::debug!(row_index, "deleted row without snapshot skipped");
            continue;
        };
        operations.push(EditOperation::Delete {
            id: operation_id(state.id(), OperationKind::Delete, *row_index),
            primary_keys: primary_keys_from(snapshot, context, columns),
            original_row: snapshot.clone(),
        });
    }

    let column_order = insert_column_order(columns);
    for draft in &state.new_rows {
        let mut insert_columns = column_order.clone();
        for column in draft.values.keys() {
            if !insert_columns.contains(column) {
                if !column_order.is_empty() {
                    tracing::debug!(
                        draft_id = %draft.id,
                        column = %column,
                        "draft column missing from metadata appended"
                    );
                }
                insert_columns.push(column.clone());
            }
        }

        let mut values = Row::new();
        let mut data_types = BTreeMap::new();
        for column in &insert_columns {
            let value = draft.values.get(column).cloned().unwrap_or(Value::Null);
            values.insert(column.clone(), value);
            data_types.insert(column.clone(), data_type_of(columns, column));
        }
        operations.push(EditOperation::Insert {
            id: draft.id.clone(),
            values,
            columns: insert_columns,
            data_types,
        });
    }

    if operations.is_empty() {
        return None;
    }

    Some(EditBatch {
        context: context.clone(),
        operations,
    })
}

fn operation_id(session_id: &str, kind: OperationKind, row_index: usize) -> String {
    let name = format!("{}/{}/{}", session_id, kind.as_str(), row_index);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
}

/// Resolve a column's data type, falling back to `text`
pub fn data_type_of(columns: &[ColumnInfo], column: &str) -> String {
    columns
        .iter()
        .find(|c| c.name == column)
        .map_or_else(|| DEFAULT_DATA_TYPE.to_string(), |c| c.data_type.clone())
}

fn primary_keys_from(snapshot: &Row, context: &EditContext, columns: &[ColumnInfo]) -> Vec<PrimaryKeyValue> {
    context
        .primary_key_columns
        .iter()
        .map(|column| PrimaryKeyValue {
            column: column.clone(),
            value: snapshot.get(column).cloned().unwrap_or(Value::Null),
            data_type: data_type_of(columns, column),
        })
        .collect()
}

/// Table columns in ordinal order
fn insert_column_order(columns: &[ColumnInfo]) -> Vec<String> {
    let mut ordered: Vec<&ColumnInfo> = columns.iter().collect();
    ordered.sort_by_key(|c| c.ordinal_position);
    ordered.into_iter().map(|c| c.name.clone()).collect()
}
