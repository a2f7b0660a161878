//! Lifecycle logging macros
//!
//! Every operation boundary emits the same canonical fields (`component`,
//! `op`, `event`) so logs can be joined per operation and per request.
//! Callers only need `rowpatch_core` in scope; `tracing` and the schema
//! constants are reached through its re-exports.

/// Shared body of the lifecycle macros
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::$event,
            $($($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use rowpatch_core::log_op_start;
/// log_op_start!("execute_batch");
/// log_op_start!("execute_batch", table = "users");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(info, $op, EVENT_START $(, $($field)*)?)
    };
}

/// Log the successful end of an operation; `duration_ms` is required
///
/// # Example
///
/// ```
/// # use rowpatch_core::log_op_end;
/// log_op_end!("execute_batch", duration_ms = 42);
/// log_op_end!("execute_batch", duration_ms = 42, rows_affected = 3u64);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log the failed end of an operation
///
/// `$err` is anything convertible into `ExError`; its kind, code and
/// message are attached.
///
/// # Example
///
/// ```
/// # use rowpatch_core::log_op_error;
/// # use rowpatch_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Connection).with_message("refused");
/// log_op_error!("execute_batch", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message()
            $(, $($field)*)?
        )
    }};
}
