//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_SESSION_ID: &str = "session_id";
pub const FIELD_OPERATION_ID: &str = "operation_id";
pub const FIELD_TABLE: &str = "table";

// Batch accounting
pub const FIELD_OPERATION_COUNT: &str = "operation_count";
pub const FIELD_ROWS_AFFECTED: &str = "rows_affected";
pub const FIELD_ERROR_COUNT: &str = "error_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";
pub const FIELD_ERR_MESSAGE: &str = "err_message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
