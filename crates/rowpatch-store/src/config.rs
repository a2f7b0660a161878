//! Connection configuration
//!
//! Loaded from TOML by the CLI; handed to a [`crate::Connector`] by the
//! executor. For SQLite, `database` is the file path.

#![allow(clippy::result_large_err)]

use rowpatch_core::Dialect;
use rowpatch_core_types::Sensitive;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{config_error, io_error, Result};

/// How to reach one database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub dialect: Dialect,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    pub database: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: Option<Sensitive<String>>,
}

impl ConnectionConfig {
    /// Configuration for a SQLite database file
    pub fn sqlite(id: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            dialect: Dialect::Sqlite,
            host: String::new(),
            port: None,
            database: path.as_ref().to_string_lossy().into_owned(),
            username: String::new(),
            password: None,
        }
    }

    /// Human-readable target for logs and errors; never includes credentials
    pub fn target(&self) -> String {
        match (self.dialect, self.port) {
            (Dialect::Sqlite, _) => format!("sqlite:{}", self.database),
            (dialect, Some(port)) => {
                format!("{}://{}:{}/{}", dialect, self.host, port, self.database)
            }
            (dialect, None) => format!("{}://{}/{}", dialect, self.host, self.database),
        }
    }
}

/// Parse a connection configuration from TOML text
pub fn parse_config_str(content: &str) -> Result<ConnectionConfig> {
    let config: ConnectionConfig = toml::from_str(content)
        .map_err(|e| config_error(format!("TOML parse error: {}", e)))?;

    if config.id.is_empty() {
        return Err(config_error("Connection id must not be empty"));
    }
    if config.database.is_empty() {
        return Err(config_error("Connection database must not be empty"));
    }
    Ok(config)
}

/// Load a connection configuration file
pub fn load_config_file(path: &Path) -> Result<ConnectionConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error("load_config", e))?;
    parse_config_str(&content)
}
