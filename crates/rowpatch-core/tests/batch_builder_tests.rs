#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{fetched_users, row, users_columns, users_context};
use rowpatch_core::{
    build_edit_batch, build_query, validate_operation, ColumnInfo, Dialect, EditOperation,
    EditSessionState, OperationKind,
};
use serde_json::{json, Value};

fn editing_session() -> EditSessionState {
    let mut state = EditSessionState::new("tab-1");
    state.enter_edit_mode(users_context()).unwrap();
    state
}

#[test]
fn test_edit_and_restore_yields_no_batch() {
    // GIVEN a fetched row {id: 1, email: a@x.com}
    let rows = fetched_users();
    let mut state = editing_session();

    // WHEN the email is edited away and back
    state.update_cell_value(0, "email", json!("b@x.com"), &rows[0]);
    state.update_cell_value(0, "email", json!("a@x.com"), &rows[0]);

    // THEN there is nothing to commit
    assert!(build_edit_batch(&state, &users_context(), &users_columns()).is_none());
}

#[test]
fn test_batch_orders_update_delete_insert() {
    // GIVEN a modified row 2, a deleted row 5 and one new row
    let mut state = editing_session();
    let row2 = row(&[("id", json!(12)), ("name", json!("Robert"))]);
    let row5 = row(&[("id", json!(15)), ("name", json!("Eve"))]);
    state.update_cell_value(2, "name", json!("Bob"), &row2);
    state.mark_row_for_deletion(5, &row5);
    state.add_new_row(row(&[("name", json!("Carl"))]));

    // WHEN building the batch
    let batch = build_edit_batch(&state, &users_context(), &users_columns()).unwrap();

    // THEN exactly one Update, one Delete, one Insert, in that order
    let kinds: Vec<OperationKind> = batch.operations.iter().map(EditOperation::kind).collect();
    assert_eq!(
        kinds,
        vec![
            OperationKind::Update,
            OperationKind::Delete,
            OperationKind::Insert
        ]
    );

    match &batch.operations[0] {
        EditOperation::Update {
            primary_keys,
            changes,
            ..
        } => {
            assert_eq!(primary_keys[0].column, "id");
            assert_eq!(primary_keys[0].value, json!(12));
            assert_eq!(primary_keys[0].data_type, "integer");
            assert_eq!(changes.len(), 1);
            assert_eq!(changes[0].old_value, json!("Robert"));
            assert_eq!(changes[0].new_value, json!("Bob"));
        }
        other => panic!("expected update, got {:?}", other),
    }
    assert_eq!(batch.operations[1].primary_keys()[0].value, json!(15));
}

#[test]
fn test_deleted_row_never_produces_update() {
    let rows = fetched_users();
    let mut state = editing_session();
    state.update_cell_value(0, "name", json!("Ann"), &rows[0]);
    state.mark_row_for_deletion(0, &rows[0]);

    let batch = build_edit_batch(&state, &users_context(), &users_columns()).unwrap();

    assert_eq!(batch.len(), 1);
    assert_eq!(batch.count(OperationKind::Delete), 1);
    assert_eq!(batch.count(OperationKind::Update), 0);
}

#[test]
fn test_updates_sorted_by_row_index() {
    let mut state = editing_session();
    for index in [7usize, 1, 4] {
        let fetched = row(&[("id", json!(index)), ("name", json!("x"))]);
        state.update_cell_value(index, "name", json!("y"), &fetched);
    }

    let batch = build_edit_batch(&state, &users_context(), &users_columns()).unwrap();

    let ids: Vec<Value> = batch
        .operations
        .iter()
        .map(|op| op.primary_keys()[0].value.clone())
        .collect();
    assert_eq!(ids, vec![json!(1), json!(4), json!(7)]);
}

#[test]
fn test_primary_key_edit_targets_fetched_row() {
    // GIVEN the id column itself is edited
    let rows = fetched_users();
    let mut state = editing_session();
    state.update_cell_value(0, "id", json!(100), &rows[0]);

    // WHEN building the batch
    let batch = build_edit_batch(&state, &users_context(), &users_columns()).unwrap();

    // THEN the row is located by the fetched id and the new id is assigned
    match &batch.operations[0] {
        EditOperation::Update {
            primary_keys,
            changes,
            ..
        } => {
            assert_eq!(primary_keys[0].value, json!(1));
            assert_eq!(changes[0].column, "id");
            assert_eq!(changes[0].new_value, json!(100));
        }
        other => panic!("expected update, got {:?}", other),
    }
}

#[test]
fn test_insert_uses_metadata_column_order_with_nulls() {
    let mut state = editing_session();
    let draft_id = state.add_new_row(row(&[("name", json!("Carl"))]));

    let batch = build_edit_batch(&state, &users_context(), &users_columns()).unwrap();

    match &batch.operations[0] {
        EditOperation::Insert {
            id,
            values,
            columns,
            data_types,
        } => {
            assert_eq!(id, &draft_id);
            assert_eq!(columns, &vec!["id", "name", "email"]);
            assert_eq!(data_types["id"], "integer");
            assert_eq!(values["id"], Value::Null);
            assert_eq!(values["name"], json!("Carl"));
            assert_eq!(values["email"], Value::Null);
        }
        other => panic!("expected insert, got {:?}", other),
    }
}

#[test]
fn test_unknown_column_type_defaults_to_text() {
    let mut state = editing_session();
    let fetched = row(&[("id", json!(1)), ("nickname", json!("al"))]);
    state.update_cell_value(0, "nickname", json!("ally"), &fetched);

    let batch = build_edit_batch(&state, &users_context(), &users_columns()).unwrap();

    match &batch.operations[0] {
        EditOperation::Update { changes, .. } => assert_eq!(changes[0].data_type, "text"),
        other => panic!("expected update, got {:?}", other),
    }
}

#[test]
fn test_build_is_pure() {
    // GIVEN a session with every kind of change
    let rows = fetched_users();
    let mut state = editing_session();
    state.update_cell_value(0, "name", json!("Ann"), &rows[0]);
    state.mark_row_for_deletion(1, &rows[1]);
    state.add_new_row(row(&[("name", json!("Carl"))]));
    let revision = state.revision();

    // WHEN building twice
    let first = build_edit_batch(&state, &users_context(), &users_columns()).unwrap();
    let second = build_edit_batch(&state, &users_context(), &users_columns()).unwrap();

    // THEN the session is untouched and both batches are identical
    assert_eq!(state.revision(), revision);
    assert_eq!(state.pending_changes_count(), 3);
    assert_eq!(first.operations, second.operations);
    assert_eq!(first, second);
}

#[test]
fn test_insert_carries_declared_json_type() {
    // GIVEN a draft with a boolean in a jsonb column
    let mut state = editing_session();
    state.add_new_row(row(&[("id", json!(7)), ("prefs", json!(true))]));
    let mut columns = users_columns();
    columns.push(ColumnInfo::new("prefs", "jsonb", 4));

    // WHEN building and synthesizing the insert
    let batch = build_edit_batch(&state, &users_context(), &columns).unwrap();
    let query = build_query(&batch.operations[0], &batch.context, &Dialect::Postgres);

    // THEN the JSON scalar is bound as text, like an Update would bind it
    assert_eq!(
        query.params,
        vec![json!(7), Value::Null, Value::Null, json!("true")]
    );
}

#[test]
fn test_insert_keeps_draft_columns_missing_from_metadata() {
    // GIVEN a draft with a column the metadata does not know
    let mut state = editing_session();
    state.add_new_row(row(&[("name", json!("Carl")), ("nickname", json!("C"))]));

    // WHEN building the batch
    let batch = build_edit_batch(&state, &users_context(), &users_columns()).unwrap();

    // THEN the extra column follows the metadata columns
    match &batch.operations[0] {
        EditOperation::Insert {
            values,
            columns,
            data_types,
            ..
        } => {
            assert_eq!(columns, &vec!["id", "name", "email", "nickname"]);
            assert_eq!(values["nickname"], json!("C"));
            assert_eq!(data_types["nickname"], "text");
        }
        other => panic!("expected insert, got {:?}", other),
    }
}

#[test]
fn test_built_operations_validate() {
    let rows = fetched_users();
    let mut state = editing_session();
    state.update_cell_value(0, "name", json!("Ann"), &rows[0]);
    state.mark_row_for_deletion(1, &rows[1]);
    state.add_new_row(row(&[("name", json!("Carl"))]));

    let batch = build_edit_batch(&state, &users_context(), &users_columns()).unwrap();

    for op in &batch.operations {
        assert!(validate_operation(op).valid, "{} should validate", op.id());
    }
}

#[test]
fn test_update_without_primary_keys_is_invalid() {
    let op = EditOperation::Update {
        id: "op-1".to_string(),
        primary_keys: vec![],
        changes: vec![rowpatch_core::ColumnChange {
            column: "name".to_string(),
            old_value: json!("a"),
            new_value: json!("b"),
            data_type: "text".to_string(),
        }],
        original_row: row(&[]),
    };

    let outcome = validate_operation(&op);

    assert!(!outcome.valid);
    assert!(!outcome.error.unwrap_or_default().is_empty());
}
