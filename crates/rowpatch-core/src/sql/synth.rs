//! Statement synthesis for edit operations
//!
//! Execution and preview share one renderer; they differ only in what is
//! written where a value goes. [`build_query`] writes placeholders and
//! collects the bound parameters. [`build_preview_sql`] inlines escaped
//! literals and must never reach a database.

use serde_json::Value;

use super::dialect::SqlDialect;
use crate::batch::DEFAULT_DATA_TYPE;
use crate::model::{EditBatch, EditContext, EditOperation, ExecutedStatement, PrimaryKeyValue};

/// A parameterized statement ready for the driver
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Where rendered values end up
trait ValueSink {
    /// Accept a value and return the SQL text standing in for it
    fn push(&mut self, data_type: &str, value: &Value) -> String;
}

struct BoundParams<'a> {
    dialect: &'a dyn SqlDialect,
    params: Vec<Value>,
}

impl ValueSink for BoundParams<'_> {
    fn push(&mut self, data_type: &str, value: &Value) -> String {
        self.params.push(self.dialect.serialize_value(data_type, value));
        self.dialect.placeholder(self.params.len())
    }
}

struct InlineLiterals<'a> {
    dialect: &'a dyn SqlDialect,
}

impl ValueSink for InlineLiterals<'_> {
    fn push(&mut self, data_type: &str, value: &Value) -> String {
        self.dialect
            .literal(&self.dialect.serialize_value(data_type, value))
    }
}

/// Build the parameterized statement for one operation
pub fn build_query(
    op: &EditOperation,
    context: &EditContext,
    dialect: &dyn SqlDialect,
) -> BuiltQuery {
    let mut sink = BoundParams {
        dialect,
        params: Vec::new(),
    };
    let sql = render(op, context, dialect, &mut sink);
    BuiltQuery {
        sql,
        params: sink.params,
    }
}

/// Build the human-readable statement for one operation
///
/// Same shape as [`build_query`] with literals in place of placeholders.
pub fn build_preview_sql(
    op: &EditOperation,
    context: &EditContext,
    dialect: &dyn SqlDialect,
) -> String {
    let mut sink = InlineLiterals { dialect };
    render(op, context, dialect, &mut sink)
}

/// Preview every operation of a batch, in batch order
pub fn preview_batch(batch: &EditBatch, dialect: &dyn SqlDialect) -> Vec<ExecutedStatement> {
    batch
        .operations
        .iter()
        .map(|op| ExecutedStatement {
            operation_id: op.id().to_string(),
            sql: build_preview_sql(op, &batch.context, dialect),
        })
        .collect()
}

fn render(
    op: &EditOperation,
    context: &EditContext,
    dialect: &dyn SqlDialect,
    sink: &mut dyn ValueSink,
) -> String {
    let table = qualified_table(context, dialect);

    match op {
        EditOperation::Update {
            primary_keys,
            changes,
            ..
        } => {
            let assignments: Vec<String> = changes
                .iter()
                .map(|c| {
                    let target = sink.push(&c.data_type, &c.new_value);
                    format!("{} = {}", dialect.quote_identifier(&c.column), target)
                })
                .collect();
            let assignments = if assignments.is_empty() {
                NO_CHANGES.to_string()
            } else {
                assignments.join(", ")
            };
            let predicate = where_clause(primary_keys, dialect, sink);
            format!("UPDATE {} SET {} WHERE {}", table, assignments, predicate)
        }
        EditOperation::Delete { primary_keys, .. } => {
            let predicate = where_clause(primary_keys, dialect, sink);
            format!("DELETE FROM {} WHERE {}", table, predicate)
        }
        EditOperation::Insert {
            values,
            columns,
            data_types,
            ..
        } => {
            let columns: Vec<&String> = if columns.is_empty() {
                values.keys().collect()
            } else {
                columns.iter().collect()
            };
            let names: Vec<String> = columns
                .iter()
                .map(|c| dialect.quote_identifier(c))
                .collect();
            let targets: Vec<String> = columns
                .iter()
                .map(|c| {
                    let value = values.get(*c).unwrap_or(&Value::Null);
                    let data_type = data_types.get(*c).map_or(DEFAULT_DATA_TYPE, String::as_str);
                    sink.push(data_type, value)
                })
                .collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table,
                names.join(", "),
                targets.join(", ")
            )
        }
    }
}

/// Stand-ins keeping previews of invalid operations readable; never executed
const NO_CHANGES: &str = "/* no changes */";
const NO_PRIMARY_KEY: &str = "/* no primary key */";

fn where_clause(
    primary_keys: &[PrimaryKeyValue],
    dialect: &dyn SqlDialect,
    sink: &mut dyn ValueSink,
) -> String {
    if primary_keys.is_empty() {
        return NO_PRIMARY_KEY.to_string();
    }
    primary_keys
        .iter()
        .map(|pk| {
            let target = sink.push(&pk.data_type, &pk.value);
            format!("{} = {}", dialect.quote_identifier(&pk.column), target)
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn qualified_table(context: &EditContext, dialect: &dyn SqlDialect) -> String {
    if context.schema.is_empty() {
        dialect.quote_identifier(&context.table)
    } else {
        format!(
            "{}.{}",
            dialect.quote_identifier(&context.schema),
            dialect.quote_identifier(&context.table)
        )
    }
}
