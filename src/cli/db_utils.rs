//! Database path and initialization utilities

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::db::Database;

/// Ensure the directory holding the database file exists
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Could not create {}", dir.display()))?;
    }
    Ok(())
}

/// Open the configured database, in memory or on disk
pub fn open_database(config: &Config) -> Result<Database> {
    if config.in_memory {
        return Database::in_memory().context("Could not create in-memory database");
    }
    ensure_database_directory(&config.database_path)?;
    Database::open(&config.database_path)
        .with_context(|| format!("Could not open {}", config.database_path.display()))
}
