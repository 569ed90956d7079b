//! Drugcomb CLI - serve and inspect the synergy score database

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use drugcomb::config;
use drugcomb::storage::SqliteStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "drugcomb")]
#[command(version = "0.1.0")]
#[command(about = "Read-only lookup service over precomputed drug-combination synergy scores")]
#[command(long_about = r#"
Drugcomb serves a precomputed table of pairwise drug-combination
synergy scores (Bliss, Loewe, HSA, ZIP plus uncertainties) over HTTP.

Example usage:
  drugcomb import --database drugcomb.db --csv scores.csv
  drugcomb serve --database drugcomb.db --port 5000
  drugcomb stats --database drugcomb.db
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a drugcomb.toml config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show statistics about the score database
    Stats {
        /// Path to the database file
        #[arg(short, long, default_value = "drugcomb.db")]
        database: PathBuf,
    },

    /// Load synergy records from a CSV export into the database
    Import {
        /// Path to the database file
        #[arg(short, long, default_value = "drugcomb.db")]
        database: PathBuf,

        /// CSV file with a drug_1,drug_2,cell_line,... header row
        #[arg(long)]
        csv: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Serve { database, port, config: config_path } => {
            let file_config = config::load_config(config_path.as_deref())?.unwrap_or_default();

            let database = database
                .or_else(|| file_config.database.clone().map(PathBuf::from))
                .unwrap_or_else(config::default_database_path);
            let port = port.or(file_config.port).unwrap_or(config::DEFAULT_PORT);

            if !database.exists() {
                anyhow::bail!(
                    "database not found at {} (run `drugcomb import` to create one)",
                    database.display()
                );
            }

            tracing::info!("Serving synergy scores from {:?}", database);
            drugcomb::server::start_server(port, database).await
        }

        Commands::Stats { database } => {
            let store = SqliteStore::open(&database)?;

            println!("📊 Drugcomb Statistics ({:?})", database);
            println!("------------------------------------");
            println!("  Records: {}", store.count_records()?);
            println!("  Drugs:   {}", store.all_drugs()?.len());
            Ok(())
        }

        Commands::Import { database, csv } => run_import(&database, &csv),
    }
}

fn run_import(database: &Path, csv_path: &Path) -> anyhow::Result<()> {
    config::ensure_db_dir(database)?;
    let mut store = SqliteStore::open(database)?;

    println!("🚀 Importing {:?} into {:?}", csv_path, database);
    let total = store.import_csv(csv_path)?;
    println!("✅ Imported {} records", total);
    Ok(())
}
