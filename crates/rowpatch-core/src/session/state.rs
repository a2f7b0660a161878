//! Per-result-set diff tracker
//!
//! Records only what the user changed: modified cells, rows marked for
//! deletion, and new-row drafts. The original values of every touched row
//! are snapshotted once so the batch builder can address the row by the
//! primary key it had when it was fetched.

use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::errors::{EditError, Result};
use crate::model::{values_equivalent, EditContext, Row};

/// Edit mode of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    Editing,
}

/// The single cell currently open in the grid editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub row_index: usize,
    pub column: String,
}

/// A row added in the grid that does not exist in the database yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewRowDraft {
    pub id: String,
    pub values: Row,
}

/// Pending change counts, as shown next to the save button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingChanges {
    /// Rows with modified cells that are not also marked for deletion
    pub modified: usize,
    pub deleted: usize,
    pub inserted: usize,
}

impl PendingChanges {
    pub fn total(&self) -> usize {
        self.modified + self.deleted + self.inserted
    }
}

/// Diff state of one open result set
#[derive(Debug, Clone)]
pub struct EditSessionState {
    id: String,
    mode: EditMode,
    context: Option<EditContext>,
    active_cell: Option<CellRef>,
    /// row index -> column -> pending value
    pub(crate) modified: BTreeMap<usize, BTreeMap<String, Value>>,
    pub(crate) deleted: BTreeSet<usize>,
    pub(crate) snapshots: BTreeMap<usize, Row>,
    pub(crate) new_rows: Vec<NewRowDraft>,
    revision: u64,
}

impl EditSessionState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mode: EditMode::Idle,
            context: None,
            active_cell: None,
            modified: BTreeMap::new(),
            deleted: BTreeSet::new(),
            snapshots: BTreeMap::new(),
            new_rows: Vec::new(),
            revision: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    /// Context set by the last `enter_edit_mode`
    pub fn context(&self) -> Option<&EditContext> {
        self.context.as_ref()
    }

    /// Monotonic counter bumped by every effective mutation
    ///
    /// UI collaborators that poll instead of subscribing compare revisions.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // ===== Mode and cursor =====

    /// Switch to edit mode for the given table
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` if the context has no primary-key columns.
    pub fn enter_edit_mode(&mut self, context: EditContext) -> Result<()> {
        if !context.is_editable() {
            return Err(EditError::NotEditable {
                table: context.qualified_name(),
            });
        }
        self.mode = EditMode::Editing;
        self.context = Some(context);
        self.touch();
        Ok(())
    }

    /// Leave edit mode; pending diffs are kept
    pub fn exit_edit_mode(&mut self) {
        if self.mode == EditMode::Idle && self.active_cell.is_none() {
            return;
        }
        self.mode = EditMode::Idle;
        self.active_cell = None;
        self.touch();
    }

    /// Open the single-cell editor on a cell, replacing any open one
    ///
    /// # Errors
    ///
    /// Returns `NotInEditMode` when the session is idle.
    pub fn begin_cell_edit(&mut self, row_index: usize, column: impl Into<String>) -> Result<()> {
        if !self.is_editing() {
            return Err(EditError::NotInEditMode {
                session_id: self.id.clone(),
            });
        }
        self.active_cell = Some(CellRef {
            row_index,
            column: column.into(),
        });
        self.touch();
        Ok(())
    }

    /// Close the single-cell editor
    pub fn end_cell_edit(&mut self) {
        if self.active_cell.take().is_some() {
            self.touch();
        }
    }

    pub fn active_cell(&self) -> Option<&CellRef> {
        self.active_cell.as_ref()
    }

    // ===== Cell edits =====

    /// Record a cell value, or drop the edit when it matches the original
    ///
    /// The original value is taken from the row's snapshot when one exists,
    /// otherwise from `original_row`. A missing column counts as `null`.
    pub fn update_cell_value(
        &mut self,
        row_index: usize,
        column: &str,
        new_value: Value,
        original_row: &Row,
    ) {
        let original = self
            .snapshots
            .get(&row_index)
            .unwrap_or(original_row)
            .get(column)
            .cloned()
            .unwrap_or(Value::Null);

        if values_equivalent(&new_value, &original) {
            if self.remove_cell_edit(row_index, column) {
                self.collect_snapshot(row_index);
                self.touch();
            }
            return;
        }

        tracing::debug!(row_index, column, "cell modified");
        self.snapshots
            .entry(row_index)
            .or_insert_with(|| original_row.clone());
        self.modified
            .entry(row_index)
            .or_default()
            .insert(column.to_string(), new_value);
        self.touch();
    }

    /// Drop the edit of one cell
    pub fn revert_cell_change(&mut self, row_index: usize, column: &str) {
        if self.remove_cell_edit(row_index, column) {
            self.collect_snapshot(row_index);
            self.touch();
        }
    }

    /// Drop every cell edit and the deletion mark of one row
    pub fn revert_row_changes(&mut self, row_index: usize) {
        let had_edits = self.modified.remove(&row_index).is_some();
        let was_deleted = self.deleted.remove(&row_index);
        if had_edits || was_deleted {
            self.collect_snapshot(row_index);
            self.touch();
        }
    }

    /// Drop all pending changes, including new-row drafts
    pub fn revert_all_changes(&mut self) {
        if !self.has_pending_changes() && self.snapshots.is_empty() && self.active_cell.is_none()
        {
            return;
        }
        self.modified.clear();
        self.deleted.clear();
        self.snapshots.clear();
        self.new_rows.clear();
        self.active_cell = None;
        self.touch();
    }

    /// Reset the diff after its batch was committed
    pub fn clear_after_commit(&mut self) {
        self.revert_all_changes();
    }

    /// Remove one cell edit, pruning the row entry when it becomes empty
    fn remove_cell_edit(&mut self, row_index: usize, column: &str) -> bool {
        let Some(columns) = self.modified.get_mut(&row_index) else {
            return false;
        };
        let removed = columns.remove(column).is_some();
        if columns.is_empty() {
            self.modified.remove(&row_index);
        }
        removed
    }

    /// Remove the snapshot of a row nothing refers to anymore
    fn collect_snapshot(&mut self, row_index: usize) {
        if !self.modified.contains_key(&row_index) && !self.deleted.contains(&row_index) {
            self.snapshots.remove(&row_index);
        }
    }

    // ===== Deletion marks =====

    /// Mark a fetched row for deletion, snapshotting it if needed
    pub fn mark_row_for_deletion(&mut self, row_index: usize, original_row: &Row) {
        self.snapshots
            .entry(row_index)
            .or_insert_with(|| original_row.clone());
        if self.deleted.insert(row_index) {
            tracing::debug!(row_index, "row marked for deletion");
            self.touch();
        }
    }

    pub fn unmark_row_for_deletion(&mut self, row_index: usize) {
        if self.deleted.remove(&row_index) {
            self.collect_snapshot(row_index);
            self.touch();
        }
    }

    // ===== New rows =====

    /// Start a new-row draft and return its id
    pub fn add_new_row(&mut self, initial_values: Row) -> String {
        let id = Uuid::now_v7().to_string();
        self.new_rows.push(NewRowDraft {
            id: id.clone(),
            values: initial_values,
        });
        self.touch();
        id
    }

    /// Set one value of a new-row draft
    ///
    /// # Errors
    ///
    /// Returns `DraftNotFound` if no draft has this id.
    pub fn update_new_row_value(&mut self, draft_id: &str, column: &str, value: Value) -> Result<()> {
        let draft = self
            .new_rows
            .iter_mut()
            .find(|d| d.id == draft_id)
            .ok_or_else(|| EditError::DraftNotFound {
                draft_id: draft_id.to_string(),
            })?;
        draft.values.insert(column.to_string(), value);
        self.touch();
        Ok(())
    }

    /// Discard a new-row draft; unknown ids are ignored
    pub fn remove_new_row(&mut self, draft_id: &str) {
        let before = self.new_rows.len();
        self.new_rows.retain(|d| d.id != draft_id);
        if self.new_rows.len() != before {
            self.touch();
        }
    }

    pub fn new_rows(&self) -> &[NewRowDraft] {
        &self.new_rows
    }

    // ===== Queries =====

    pub fn pending_changes(&self) -> PendingChanges {
        PendingChanges {
            modified: self
                .modified
                .keys()
                .filter(|row| !self.deleted.contains(row))
                .count(),
            deleted: self.deleted.len(),
            inserted: self.new_rows.len(),
        }
    }

    pub fn pending_changes_count(&self) -> usize {
        self.pending_changes().total()
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.modified.is_empty() || !self.deleted.is_empty() || !self.new_rows.is_empty()
    }

    pub fn is_cell_modified(&self, row_index: usize, column: &str) -> bool {
        self.modified
            .get(&row_index)
            .is_some_and(|columns| columns.contains_key(column))
    }

    /// Pending value of a cell, if it was modified
    pub fn cell_value(&self, row_index: usize, column: &str) -> Option<&Value> {
        self.modified.get(&row_index)?.get(column)
    }

    /// Pending values of a row, keyed by column
    pub fn row_changes(&self, row_index: usize) -> Option<&BTreeMap<String, Value>> {
        self.modified.get(&row_index)
    }

    pub fn is_row_deleted(&self, row_index: usize) -> bool {
        self.deleted.contains(&row_index)
    }

    pub fn snapshot(&self, row_index: usize) -> Option<&Row> {
        self.snapshots.get(&row_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: i64, email: &str) -> Row {
        let mut r = Row::new();
        r.insert("id".to_string(), json!(id));
        r.insert("email".to_string(), json!(email));
        r
    }

    #[test]
    fn test_enter_edit_mode_requires_primary_key() {
        let mut state = EditSessionState::new("tab-1");
        let err = state
            .enter_edit_mode(EditContext::new("public", "logs", vec![]))
            .unwrap_err();
        assert!(matches!(err, EditError::NotEditable { .. }));
        assert_eq!(state.mode(), EditMode::Idle);
    }

    #[test]
    fn test_cell_cursor_requires_edit_mode() {
        let mut state = EditSessionState::new("tab-1");
        assert!(state.begin_cell_edit(0, "email").is_err());

        state
            .enter_edit_mode(EditContext::new("public", "users", vec!["id".to_string()]))
            .unwrap();
        state.begin_cell_edit(0, "email").unwrap();
        state.begin_cell_edit(3, "id").unwrap();
        assert_eq!(
            state.active_cell(),
            Some(&CellRef {
                row_index: 3,
                column: "id".to_string()
            })
        );

        state.exit_edit_mode();
        assert!(state.active_cell().is_none());
    }

    #[test]
    fn test_snapshot_first_write_wins() {
        let mut state = EditSessionState::new("tab-1");
        let original = row(1, "a@x.com");
        state.update_cell_value(0, "email", json!("b@x.com"), &original);

        // A later call carrying an already-edited row must not replace the snapshot
        let edited = row(1, "b@x.com");
        state.update_cell_value(0, "email", json!("c@x.com"), &edited);

        assert_eq!(state.snapshot(0), Some(&original));
        assert_eq!(state.cell_value(0, "email"), Some(&json!("c@x.com")));
    }

    #[test]
    fn test_revert_to_original_drops_edit_and_snapshot() {
        let mut state = EditSessionState::new("tab-1");
        let original = row(1, "a@x.com");
        state.update_cell_value(0, "email", json!("b@x.com"), &original);
        state.update_cell_value(0, "email", json!("a@x.com"), &original);

        assert!(!state.is_cell_modified(0, "email"));
        assert!(state.snapshot(0).is_none());
        assert!(!state.has_pending_changes());
    }

    #[test]
    fn test_deletion_keeps_snapshot_alive() {
        let mut state = EditSessionState::new("tab-1");
        let original = row(1, "a@x.com");
        state.update_cell_value(0, "email", json!("b@x.com"), &original);
        state.mark_row_for_deletion(0, &original);

        state.revert_cell_change(0, "email");
        assert!(state.snapshot(0).is_some(), "deletion mark still refers to the row");

        state.unmark_row_for_deletion(0);
        assert!(state.snapshot(0).is_none());
    }

    #[test]
    fn test_null_and_empty_string_do_not_create_edits() {
        let mut state = EditSessionState::new("tab-1");
        let mut original = Row::new();
        original.insert("id".to_string(), json!(1));
        original.insert("nickname".to_string(), Value::Null);

        state.update_cell_value(0, "nickname", json!(""), &original);
        assert!(!state.has_pending_changes());
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn test_revision_only_moves_on_effective_changes() {
        let mut state = EditSessionState::new("tab-1");
        state.revert_all_changes();
        state.unmark_row_for_deletion(4);
        state.remove_new_row("missing");
        assert_eq!(state.revision(), 0);

        state.mark_row_for_deletion(4, &row(5, "e@x.com"));
        assert_eq!(state.revision(), 1);
        state.mark_row_for_deletion(4, &row(5, "e@x.com"));
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn test_update_unknown_draft() {
        let mut state = EditSessionState::new("tab-1");
        let err = state
            .update_new_row_value("nope", "name", json!("Carl"))
            .unwrap_err();
        assert!(matches!(err, EditError::DraftNotFound { .. }));
    }
}
