//! rowpatch Store - database access for the executor
//!
//! Provides:
//! - The driver interface (`SqlConnection`, `Connector`) the executor runs against
//! - `ConnectionConfig`, loadable from TOML
//! - A SQLite adapter over rusqlite
//! - Store error helpers mapping driver failures onto `ExError` kinds

pub mod config;
pub mod db;
pub mod driver;
pub mod errors;
pub mod sqlite;

// Re-export key types
pub use config::{load_config_file, parse_config_str, ConnectionConfig};
pub use driver::{Connector, QueryOutput, SqlConnection};
pub use errors::Result;
pub use sqlite::{SqliteConnection, SqliteConnector};
