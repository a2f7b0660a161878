#![allow(clippy::unwrap_used, clippy::expect_used)]

use rowpatch_core::errors::{EditError, ExError, ExErrorKind};
use rowpatch_core::logging_facility::test_capture::init_test_capture;
use rowpatch_core::{log_op_end, log_op_error, log_op_start};
use rowpatch_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "log_start_probe";

    log_op_start!(op_name, table = "public.users");

    let starts: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event() == Some(EVENT_START))
        .collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].field("table"), Some("public.users"));
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "log_end_probe";

    log_op_end!(op_name, duration_ms = 42, rows_affected = 3u64);

    let ends = capture.events_for_op(op_name);
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].event(), Some(EVENT_END));
    assert_eq!(ends[0].field("duration_ms"), Some("42"));
    assert_eq!(ends[0].field("rows_affected"), Some("3"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "log_error_probe";

    let err = EditError::SessionNotFound {
        session_id: "tab-9".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let errors: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field("err_code"), Some("ERR_SESSION_NOT_FOUND"));
    assert_eq!(errors[0].level, tracing::Level::ERROR);
}

#[test]
fn test_log_op_error_accepts_ex_error() {
    let capture = init_test_capture();
    let op_name = "log_ex_error_probe";

    let err = ExError::new(ExErrorKind::Connection).with_message("connection refused");
    log_op_error!(op_name, err, duration_ms = 1);

    let event = capture.events_for_op(op_name).pop().unwrap();
    assert_eq!(event.field("err_code"), Some("ERR_CONNECTION"));
    assert_eq!(event.field("err_message"), Some("connection refused"));
}

#[test]
fn test_single_start_and_end_per_operation() {
    let capture = init_test_capture();
    let op_name = "log_boundary_probe";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 5);

    capture.assert_event_exists(op_name, EVENT_START);
    capture.assert_event_exists(op_name, EVENT_END);
    let count = capture.count_events(|e| e.op() == Some(op_name));
    assert_eq!(count, 2);
}
