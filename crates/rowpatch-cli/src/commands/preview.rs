//! Preview command
//!
//! Usage: rowpatch preview --batch <FILE> [--dialect <DIALECT>]

use clap::Args;
use rowpatch_core::Dialect;
use rowpatch_engine::db_preview_sql;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Edit batch JSON file
    #[arg(long)]
    pub batch: PathBuf,

    /// Target dialect: postgresql, mysql or sqlite
    #[arg(long, default_value = "postgresql")]
    pub dialect: String,
}

/// Execute preview command
pub fn execute(args: PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dialect: Dialect = args.dialect.parse()?;
    let batch = super::read_batch(&args.batch)?;

    let response = db_preview_sql(&batch, dialect);
    println!("{}", serde_json::to_string_pretty(&response)?);

    match response.error {
        Some(message) => Err(message.into()),
        None => Ok(()),
    }
}
