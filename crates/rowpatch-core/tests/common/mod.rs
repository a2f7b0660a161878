use rowpatch_core::{ColumnInfo, EditContext, Row};
use serde_json::{json, Value};

/// Editing context for the `public.users` fixture table
#[allow(dead_code)]
pub fn users_context() -> EditContext {
    EditContext::new("public", "users", vec!["id".to_string()])
}

/// Column metadata for `public.users`, in ordinal order
#[allow(dead_code)]
pub fn users_columns() -> Vec<ColumnInfo> {
    vec![
        ColumnInfo::new("id", "integer", 1).primary_key(),
        ColumnInfo::new("name", "text", 2),
        ColumnInfo::new("email", "text", 3),
    ]
}

/// Build a row from column/value pairs
#[allow(dead_code)]
pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// The two fetched rows used throughout the scenario tests
#[allow(dead_code)]
pub fn fetched_users() -> Vec<Row> {
    vec![
        row(&[
            ("id", json!(1)),
            ("name", json!("Alice")),
            ("email", json!("a@x.com")),
        ]),
        row(&[
            ("id", json!(2)),
            ("name", json!("Bob")),
            ("email", json!("b@x.com")),
        ]),
    ]
}
