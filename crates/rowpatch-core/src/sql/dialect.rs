//! Database dialects
//!
//! The set of supported databases is closed; everything the synthesizer
//! needs from a dialect goes through [`SqlDialect`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::errors::EditError;

/// Capabilities the synthesizer needs from a SQL dialect
pub trait SqlDialect {
    /// Quote one identifier (no schema splitting)
    fn quote_identifier(&self, ident: &str) -> String;

    /// Placeholder for the `n`-th bound parameter, 1-based
    fn placeholder(&self, n: usize) -> String;

    /// Prepare a value for binding
    ///
    /// JSON-typed columns and structured values are bound as JSON text;
    /// everything else passes through unchanged.
    fn serialize_value(&self, data_type: &str, value: &Value) -> Value {
        match value {
            Value::Null | Value::String(_) => value.clone(),
            Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
            Value::Bool(_) | Value::Number(_) if is_json_type(data_type) => {
                Value::String(value.to_string())
            }
            _ => value.clone(),
        }
    }

    /// Escape the body of a single-quoted string literal
    fn escape_string_literal(&self, raw: &str) -> String {
        raw.replace('\'', "''")
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// Inline a bound value as a SQL literal, for display only
    fn literal(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.bool_literal(*b).to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => format!("'{}'", self.escape_string_literal(s)),
            Value::Array(_) | Value::Object(_) => {
                format!("'{}'", self.escape_string_literal(&value.to_string()))
            }
        }
    }
}

/// Whether a column type holds JSON documents
pub fn is_json_type(data_type: &str) -> bool {
    matches!(data_type.to_ascii_lowercase().as_str(), "json" | "jsonb")
}

/// Supported databases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    #[serde(rename = "postgresql", alias = "postgres")]
    Postgres,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "sqlite")]
    Sqlite,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Postgres => "postgresql",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(EditError::InvalidInput {
                reason: format!("Unknown dialect: {}", other),
            }),
        }
    }
}

impl SqlDialect for Dialect {
    fn quote_identifier(&self, ident: &str) -> String {
        match self {
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
            Dialect::Postgres | Dialect::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }

    fn placeholder(&self, n: usize) -> String {
        match self {
            Dialect::Postgres => format!("${}", n),
            Dialect::MySql => "?".to_string(),
            Dialect::Sqlite => format!("?{}", n),
        }
    }

    fn escape_string_literal(&self, raw: &str) -> String {
        match self {
            // MySQL treats backslash as an escape inside string literals by default
            Dialect::MySql => raw.replace('\\', "\\\\").replace('\'', "''"),
            Dialect::Postgres | Dialect::Sqlite => raw.replace('\'', "''"),
        }
    }
}
