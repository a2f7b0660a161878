//! Mutation target and column metadata

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A fetched row, keyed by column name
pub type Row = BTreeMap<String, Value>;

/// Identifies the table being edited and the columns that give row identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditContext {
    /// Schema (or database, for MySQL); empty means unqualified
    #[serde(default)]
    pub schema: String,
    pub table: String,
    pub primary_key_columns: Vec<String>,
}

impl EditContext {
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        primary_key_columns: Vec<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            primary_key_columns,
        }
    }

    /// Editing is only possible when rows can be addressed by primary key
    pub fn is_editable(&self) -> bool {
        !self.primary_key_columns.is_empty()
    }

    /// `schema.table`, or just `table` when no schema is set
    pub fn qualified_name(&self) -> String {
        if self.schema.is_empty() {
            self.table.clone()
        } else {
            format!("{}.{}", self.schema, self.table)
        }
    }
}

/// Column metadata as reported by schema introspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default = "default_nullable")]
    pub is_nullable: bool,
    pub ordinal_position: u32,
}

fn default_nullable() -> bool {
    true
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, ordinal_position: u32) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            is_nullable: true,
            ordinal_position,
        }
    }

    /// Mark the column as part of the primary key (and not nullable)
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }
}
