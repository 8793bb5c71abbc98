//! studytrack: backend for a student study-tracking application
//!
//! A JSON REST API over an embedded SQLite store. Uses axum for HTTP and
//! rusqlite for storage.
//!
//! ## Features
//!
//! - Notes per subject with threaded comments (cascade on delete)
//! - File uploads per subject, deletable by their uploader or the admin
//! - Questions, answers and grades (regrading replaces the previous grade)
//! - Reflections (journal) with soft delete and restore
//! - Per-subject progress values with upsert semantics
//! - Experience points and levels with an append-only XP ledger
//!
//! ## Leveling
//!
//! Every 100 XP is converted into one level; the stored xp is the remainder
//! toward the next level. See [`xp`].

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod storage;
pub mod types;
pub mod xp;

pub use error::{Error, Result};
