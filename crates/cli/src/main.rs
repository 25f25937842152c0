//! Cafe Map CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! cafe-cli migrate
//!
//! # Hash a delete key for CAFE_SECRET_KEY
//! cafe-cli hash-key --key "correct horse battery staple"
//!
//! # Insert cafes from a YAML file
//! cafe-cli seed cafes.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `CAFE_DATABASE_URL` - `SQLite` URL (falls back to `DATABASE_URL`, default: `sqlite://cafes.db`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cafe-cli")]
#[command(author, version, about = "Cafe Map CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Print the Argon2 hash of a delete key
    HashKey {
        /// The key to hash
        #[arg(short, long)]
        key: String,
    },
    /// Insert cafes from a YAML list, skipping names that already exist
    Seed {
        /// Path to the YAML file
        file: PathBuf,
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
        Commands::HashKey { key } => commands::hash_key::run(&key)?,
        Commands::Seed { file } => commands::seed::run(&file).await?,
    }
    Ok(())
}
