//! SQL synthesis
//!
//! - [`dialect`]: identifier quoting, placeholders and value handling per database
//! - [`synth`]: parameterized statements for execution, literal SQL for preview

pub mod dialect;
pub mod synth;

pub use dialect::{Dialect, SqlDialect};
pub use synth::{build_preview_sql, build_query, preview_batch, BuiltQuery};
