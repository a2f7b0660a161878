//! rowpatch CLI
//!
//! Preview or apply an edit batch from the command line

use clap::{Parser, Subcommand};
use rowpatch_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "rowpatch")]
#[command(about = "rowpatch - preview and apply grid edit batches", long_about = None)]
struct Cli {
    /// Logging profile: development (human-readable) or production (JSON)
    #[arg(long, global = true, default_value = "development")]
    log_profile: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the SQL a batch would run, with literals inlined
    Preview(commands::preview::PreviewArgs),
    /// Execute a batch in one transaction
    Apply(commands::apply::ApplyArgs),
}

fn main() {
    let cli = Cli::parse();
    init(Profile::parse(&cli.log_profile));

    let result = match cli.command {
        Commands::Preview(args) => commands::preview::execute(args),
        Commands::Apply(args) => commands::apply::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
