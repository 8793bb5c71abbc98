//! Database module for studytrack
//!
//! Handles SQLite storage for every resource:
//! - Schema creation
//! - Notes and comments, files, reflections
//! - Questions, answers and grades
//! - Progress and experience points
//!
//! Multi-statement operations (cascading deletes, grade replacement, XP
//! accumulation) run inside a single transaction and therefore take
//! `&mut self`.

mod files;
mod notes;
mod progress;
mod questions;
mod reflections;
mod schema;
mod users;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;

use crate::error::Result;
use crate::types::StoreStats;

pub use files::can_delete_file;

/// Database handle for the study tracker
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize the database schema
    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(schema::SCHEMA)?;
        Ok(())
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Row counts per table and the on-disk size
    pub fn get_stats(&self) -> Result<StoreStats> {
        let mut tables = Vec::with_capacity(schema::TABLES.len());
        for table in schema::TABLES {
            let count: u64 = self.conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", table),
                [],
                |row| row.get(0),
            )?;
            tables.push((*table, count));
        }

        let db_size_bytes: u64 = self
            .conn
            .query_row(
                "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        Ok(StoreStats {
            tables,
            db_size_bytes,
        })
    }
}

/// Current time as stored in timestamp columns
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a stored timestamp back into a UTC datetime
pub(crate) fn to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}
