//! Catalog CLI - database migrations and bulk import.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! catalog-cli migrate
//!
//! # Validate a bulk payload without writing
//! catalog-cli import products.json --dry-run
//!
//! # Apply a bulk payload in one transaction
//! catalog-cli import products.json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `import` - Apply a bulk upsert/delete payload from a file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about = "Catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Apply a bulk payload file
    Import {
        /// JSON file in the bulk-insert body format
        file: PathBuf,

        /// Decode and validate only
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Import { file, dry_run } => commands::import::run(&file, dry_run).await?,
    }
    Ok(())
}
