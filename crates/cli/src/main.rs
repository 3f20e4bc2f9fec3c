//! Vitrine CLI - Database migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply the document schema and the admin session table
//! vitrine-cli migrate
//!
//! # Load categories, products and media from a YAML file
//! vitrine-cli seed catalog.yaml
//!
//! # Replace the catalog with the file contents
//! vitrine-cli seed catalog.yaml --clear
//!
//! # Write the storefront sitemap to a file
//! vitrine-cli sitemap --base-url https://example.uz --out sitemap.xml
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string used by every command

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine-cli")]
#[command(author, version, about = "Vitrine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog from a YAML file
    Seed {
        /// Path to the catalog file
        file: PathBuf,

        /// Delete existing products, categories and media first
        #[arg(long)]
        clear: bool,
    },
    /// Export the storefront sitemap
    Sitemap {
        /// Public storefront URL, e.g. `https://example.uz`
        #[arg(short, long)]
        base_url: String,

        /// Output file
        #[arg(short, long, default_value = "sitemap.xml")]
        out: PathBuf,
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
        Commands::Seed { file, clear } => commands::seed::run(&file, clear).await?,
        Commands::Sitemap { base_url, out } => commands::sitemap::run(&base_url, &out).await?,
    }
    Ok(())
}
