use rowpatch_core_types::RequestId;
use thiserror::Error;

/// Result type alias using EditError
pub type Result<T> = std::result::Result<T, EditError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// testing, and transport responses. The kinds split into per-operation
/// errors (`Validation`, `StatementExecution`), which are collected by the
/// executor, and fatal ones (`Connection`, `TransactionControl`), which
/// abort the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Session / input
    InvalidInput,
    NotEditable,
    NotInEditMode,
    SessionNotFound,
    DraftNotFound,

    // Per-operation
    Validation,
    StatementExecution,

    // Fatal to a batch
    Connection,
    TransactionControl,

    // Integration/IO
    Config,
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotEditable => "ERR_NOT_EDITABLE",
            ExErrorKind::NotInEditMode => "ERR_NOT_IN_EDIT_MODE",
            ExErrorKind::SessionNotFound => "ERR_SESSION_NOT_FOUND",
            ExErrorKind::DraftNotFound => "ERR_DRAFT_NOT_FOUND",
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::StatementExecution => "ERR_STATEMENT_EXECUTION",
            ExErrorKind::Connection => "ERR_CONNECTION",
            ExErrorKind::TransactionControl => "ERR_TRANSACTION_CONTROL",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether an error of this kind aborts the whole batch
    pub fn is_fatal_to_batch(&self) -> bool {
        matches!(
            self,
            ExErrorKind::Connection | ExErrorKind::TransactionControl
        )
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and enough
/// context (operation, session, edit operation id) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    session_id: Option<String>,
    operation_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            session_id: None,
            operation_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add editing session context
    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Add edit operation context
    pub fn with_operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the session context, if any
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Get the edit operation id, if any
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(session_id) = &self.session_id {
            write!(f, " (session_id: {})", session_id)?;
        }
        if let Some(operation_id) = &self.operation_id {
            write!(f, " (operation_id: {})", operation_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for edit-session and batch operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Edit mode requires at least one primary-key column
    #[error("Table {table} has no primary key; editing is disabled")]
    NotEditable { table: String },

    /// A session operation that needs edit mode was called outside it
    #[error("Session {session_id} is not in edit mode")]
    NotInEditMode { session_id: String },

    /// No session is registered under this id
    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    /// No new-row draft with this id exists in the session
    #[error("New row draft not found: {draft_id}")]
    DraftNotFound { draft_id: String },

    /// Structural problem with a single edit operation
    #[error("Invalid operation {operation_id}: {reason}")]
    InvalidOperation {
        operation_id: String,
        reason: String,
    },

    /// Invalid caller input
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Serialization failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from EditError to ExError
impl From<EditError> for ExError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::NotEditable { table } => ExError::new(ExErrorKind::NotEditable)
                .with_op("enter_edit_mode")
                .with_message(format!("Table {} has no primary key", table)),

            EditError::NotInEditMode { session_id } => ExError::new(ExErrorKind::NotInEditMode)
                .with_session_id(session_id)
                .with_message("Session is not in edit mode"),

            EditError::SessionNotFound { session_id } => {
                ExError::new(ExErrorKind::SessionNotFound)
                    .with_session_id(session_id)
                    .with_message("Session not found")
            }

            EditError::DraftNotFound { draft_id } => ExError::new(ExErrorKind::DraftNotFound)
                .with_op("update_new_row_value")
                .with_message(format!("New row draft not found: {}", draft_id)),

            EditError::InvalidOperation {
                operation_id,
                reason,
            } => ExError::new(ExErrorKind::Validation)
                .with_op("validate_operation")
                .with_operation_id(operation_id)
                .with_message(reason),

            EditError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            EditError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to EditError
impl From<serde_json::Error> for EditError {
    fn from(err: serde_json::Error) -> Self {
        EditError::Serialization {
            message: err.to_string(),
        }
    }
}
