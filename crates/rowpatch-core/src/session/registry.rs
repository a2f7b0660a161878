//! Keyed registry of editing sessions
//!
//! One session per open result-grid tab. Sessions never share state. The
//! registry is single-writer: the UI event loop owns it and mutates it
//! synchronously. Observers either poll `revision()` or subscribe a
//! listener that is called after each effective mutation.

use serde_json::Value;
use std::collections::HashMap;

use super::state::{EditSessionState, PendingChanges};
use crate::batch::build_edit_batch;
use crate::errors::{EditError, Result};
use crate::model::{ColumnInfo, EditBatch, EditContext, Row};

/// Notification sent to registry listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session's diff or mode changed
    Changed {
        revision: u64,
        editing: bool,
        pending: PendingChanges,
    },
    /// The session was dropped from the registry
    Closed,
}

type Listener = Box<dyn Fn(&str, &SessionEvent) + Send + Sync>;

/// Registry of editing sessions keyed by session (tab) id
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, EditSessionState>,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change listener
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&str, &SessionEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn get(&self, session_id: &str) -> Option<&EditSessionState> {
        self.sessions.get(session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn session_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sessions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Drop a session and everything it tracks
    pub fn close(&mut self, session_id: &str) -> Option<EditSessionState> {
        let removed = self.sessions.remove(session_id);
        if removed.is_some() {
            self.notify(session_id, &SessionEvent::Closed);
        }
        removed
    }

    /// Run a mutation against a session, creating it on first use
    ///
    /// Listeners are notified when the mutation changed the session.
    pub fn update<R>(&mut self, session_id: &str, f: impl FnOnce(&mut EditSessionState) -> R) -> R {
        let state = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| EditSessionState::new(session_id));
        let before = state.revision();
        let out = f(state);

        if state.revision() != before {
            let event = SessionEvent::Changed {
                revision: state.revision(),
                editing: state.is_editing(),
                pending: state.pending_changes(),
            };
            self.notify(session_id, &event);
        }
        out
    }

    fn notify(&self, session_id: &str, event: &SessionEvent) {
        for listener in &self.listeners {
            listener(session_id, event);
        }
    }

    // ===== Session operations, keyed by session id =====

    /// # Errors
    ///
    /// Returns `NotEditable` if the context has no primary-key columns.
    pub fn enter_edit_mode(&mut self, session_id: &str, context: EditContext) -> Result<()> {
        self.update(session_id, |s| s.enter_edit_mode(context))
    }

    pub fn exit_edit_mode(&mut self, session_id: &str) {
        self.update(session_id, |s| s.exit_edit_mode())
    }

    /// # Errors
    ///
    /// Returns `NotInEditMode` when the session is idle.
    pub fn begin_cell_edit(&mut self, session_id: &str, row_index: usize, column: &str) -> Result<()> {
        self.update(session_id, |s| s.begin_cell_edit(row_index, column))
    }

    pub fn end_cell_edit(&mut self, session_id: &str) {
        self.update(session_id, |s| s.end_cell_edit())
    }

    pub fn update_cell_value(
        &mut self,
        session_id: &str,
        row_index: usize,
        column: &str,
        new_value: Value,
        original_row: &Row,
    ) {
        self.update(session_id, |s| {
            s.update_cell_value(row_index, column, new_value, original_row)
        })
    }

    pub fn revert_cell_change(&mut self, session_id: &str, row_index: usize, column: &str) {
        self.update(session_id, |s| s.revert_cell_change(row_index, column))
    }

    pub fn revert_row_changes(&mut self, session_id: &str, row_index: usize) {
        self.update(session_id, |s| s.revert_row_changes(row_index))
    }

    pub fn revert_all_changes(&mut self, session_id: &str) {
        self.update(session_id, |s| s.revert_all_changes())
    }

    pub fn mark_row_for_deletion(&mut self, session_id: &str, row_index: usize, original_row: &Row) {
        self.update(session_id, |s| s.mark_row_for_deletion(row_index, original_row))
    }

    pub fn unmark_row_for_deletion(&mut self, session_id: &str, row_index: usize) {
        self.update(session_id, |s| s.unmark_row_for_deletion(row_index))
    }

    pub fn add_new_row(&mut self, session_id: &str, initial_values: Row) -> String {
        self.update(session_id, |s| s.add_new_row(initial_values))
    }

    /// # Errors
    ///
    /// Returns `DraftNotFound` if the session has no draft with this id.
    pub fn update_new_row_value(
        &mut self,
        session_id: &str,
        draft_id: &str,
        column: &str,
        value: Value,
    ) -> Result<()> {
        self.update(session_id, |s| s.update_new_row_value(draft_id, column, value))
    }

    pub fn remove_new_row(&mut self, session_id: &str, draft_id: &str) {
        self.update(session_id, |s| s.remove_new_row(draft_id))
    }

    /// Pending change count; 0 for unknown sessions
    pub fn pending_changes_count(&self, session_id: &str) -> usize {
        self.sessions
            .get(session_id)
            .map_or(0, EditSessionState::pending_changes_count)
    }

    /// Build the batch for a session using the context it entered edit mode with
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` for unknown sessions and `NotInEditMode`
    /// when the session never entered edit mode.
    pub fn build_edit_batch(&self, session_id: &str, columns: &[ColumnInfo]) -> Result<Option<EditBatch>> {
        let state = self
            .sessions
            .get(session_id)
            .ok_or_else(|| EditError::SessionNotFound {
                session_id: session_id.to_string(),
            })?;
        let context = state.context().ok_or_else(|| EditError::NotInEditMode {
            session_id: session_id.to_string(),
        })?;
        Ok(build_edit_batch(state, context, columns))
    }

    /// Reset a session's diff after its batch committed
    pub fn clear_after_commit(&mut self, session_id: &str) {
        if self.contains(session_id) {
            self.update(session_id, |s| s.clear_after_commit())
        }
    }
}
