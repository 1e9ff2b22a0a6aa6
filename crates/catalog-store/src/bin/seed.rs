//! # Seed Data Writer
//!
//! Writes the bundled users, products, categories and sellers into a
//! catalog database so it can be inspected or shipped pre-filled.
//!
//! ## Usage
//! ```bash
//! # Seed the configured database
//! cargo run -p catalog-store --bin seed
//!
//! # Specify database path
//! cargo run -p catalog-store --bin seed -- --db ./data/catalog.db
//!
//! # Overwrite collections that already exist
//! cargo run -p catalog-store --bin seed -- --force
//! ```

use std::env;
use std::path::PathBuf;

use catalog_db::migrations;
use catalog_store::storage::{keys, save_json};
use catalog_store::{CatalogConfig, KeyValueStore, SeedData, SqliteKeyValueStore, StoreResult};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,catalog=debug,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("Catalog Seed Data Writer");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>       Database file path (default: from config)");
                println!("  -c, --config <PATH>   Config file (default: platform config dir)");
                println!("  -f, --force           Overwrite collections that already exist");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let mut config = CatalogConfig::load(config_path)?;
    if let Some(path) = db_path {
        config.database_path = path;
    }

    config.ensure_data_dir()?;

    info!(path = %config.database_path.display(), force, "Seeding catalog database");

    let storage = SqliteKeyValueStore::open(config.db_config()).await?;

    let db = storage.database();
    if !db.health_check().await {
        return Err("database is not answering queries".into());
    }
    let (total, applied) = migrations::migration_status(db.pool()).await?;
    info!(total, applied, "Schema ready");

    let seed = SeedData::bundled()?;

    let mut written = 0;
    written += write_if_missing(&storage, keys::USERS, &seed.users, force).await?;
    written += write_if_missing(&storage, keys::PRODUCTS, &seed.products, force).await?;
    written += write_if_missing(&storage, keys::CATEGORIES, &seed.categories, force).await?;
    written += write_if_missing(&storage, keys::SELLERS, &seed.sellers, force).await?;

    storage.close().await;

    info!(collections = written, "Seed complete");
    Ok(())
}

/// Writes `items` under `key` unless something is already stored there.
///
/// ## Returns
/// 1 if the collection was written, 0 if it was skipped.
async fn write_if_missing<T: Serialize>(
    storage: &SqliteKeyValueStore,
    key: &str,
    items: &[T],
    force: bool,
) -> StoreResult<usize> {
    if !force && storage.get(key).await?.is_some() {
        warn!(key = %key, "Collection already stored, skipping (use --force to overwrite)");
        return Ok(0);
    }

    save_json(storage, key, items).await?;
    info!(key = %key, count = items.len(), "Collection written");
    Ok(1)
}
