//! Command implementations for CLI operations

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::db::Database;

use super::db_utils::open_database;

/// Show row counts for the configured database
pub fn status_command(config: &Config) -> Result<()> {
    if !config.in_memory && !config.database_path.exists() {
        println!("No database found at {}", config.database_path.display());
        println!("Run 'studytrack serve' to create one.");
        return Ok(());
    }

    let db = open_database(config)?;
    let stats = db.get_stats()?;

    println!("studytrack Store Status");
    println!("=======================");
    println!("Database: {}", config.database_path.display());
    println!("Size: {:.2} KB", stats.db_size_bytes as f64 / 1024.0);
    println!("\nRows:");
    for (table, count) in &stats.tables {
        println!("  {}: {}", table, count);
    }

    Ok(())
}

/// Initialize database for server mode
pub fn initialize_server_database(config: &Config) -> Result<Database> {
    let db = open_database(config)?;

    if config.in_memory {
        info!("Using in-memory database (no filesystem writes)");
    } else {
        info!("Database: {}", config.database_path.display());
    }

    let stats = db.get_stats()?;
    let total: u64 = stats.tables.iter().map(|(_, count)| count).sum();
    info!("Store loaded: {} rows across {} tables", total, stats.tables.len());

    Ok(db)
}
