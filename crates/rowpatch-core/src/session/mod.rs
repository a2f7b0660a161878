//! Edit session store
//!
//! - [`EditSessionState`]: the sparse diff of one open result set
//! - [`SessionRegistry`]: sessions keyed by tab id, with change listeners

pub mod registry;
pub mod state;

pub use registry::{SessionEvent, SessionRegistry};
pub use state::{CellRef, EditMode, EditSessionState, NewRowDraft, PendingChanges};
