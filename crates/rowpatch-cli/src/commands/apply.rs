//! Apply command
//!
//! Usage: rowpatch apply --batch <FILE> --config <FILE> [--dry-run] [--allow-unmatched]

use clap::Args;
use rowpatch_engine::{db_execute_with_options, ExecuteOptions, RowCountPolicy};
use rowpatch_store::{load_config_file, SqliteConnector};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Edit batch JSON file
    #[arg(long)]
    pub batch: PathBuf,

    /// Connection configuration TOML file
    #[arg(long)]
    pub config: PathBuf,

    /// Run every statement, then roll back
    #[arg(long)]
    pub dry_run: bool,

    /// Treat updates and deletes that match no row as success
    #[arg(long)]
    pub allow_unmatched: bool,
}

/// Execute apply command
pub fn execute(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_file(&args.config)?;
    let batch = super::read_batch(&args.batch)?;
    let options = ExecuteOptions {
        row_count_policy: if args.allow_unmatched {
            RowCountPolicy::Ignore
        } else {
            RowCountPolicy::RequireMatch
        },
        dry_run: args.dry_run,
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let response = runtime.block_on(db_execute_with_options(
        &SqliteConnector,
        &config,
        &batch,
        options,
    ));
    println!("{}", serde_json::to_string_pretty(&response)?);

    if let Some(message) = response.error {
        return Err(message.into());
    }
    match response.data {
        Some(result) if !result.success => Err(format!(
            "Batch rolled back: {} operation(s) failed",
            result.errors().len()
        )
        .into()),
        _ => Ok(()),
    }
}
