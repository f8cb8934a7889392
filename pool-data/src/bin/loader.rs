use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pool_data::CatalogLoader;
use pool_db_sqlite::SqliteRepository;

/// Load a product price list from a CSV file into the database.
///
/// The CSV file has a header row with these columns:
/// - id: Stable product id; reloading replaces the product
/// - category: bowls, filtration, heating, parts, additional, accessories or chemicals
/// - name: Product name shown in estimates
/// - price: Price in roubles
/// - unit, installation_price, kind, flow_rate, power, manufacturer,
///   length, width, depth: Optional, may be left empty
///
/// Every category present in the file replaces what the database holds for it.
#[derive(Parser, Debug)]
#[command(name = "pool-catalog-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing the price list
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database URL (e.g., sqlite:estimates.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:estimates.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    println!("Loading price list from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let records = CatalogLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let inserted = CatalogLoader::load(&repo, &records)
        .await
        .context("Failed to load products into database")?;

    println!("Successfully loaded {} products into the database.", inserted);

    Ok(())
}
