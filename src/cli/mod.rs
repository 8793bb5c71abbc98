//! CLI command implementations
//!
//! Handles the command-line operations besides serving:
//! - status: Show row counts per table
//! - server database initialization

mod commands;
mod db_utils;

pub use commands::*;
pub use db_utils::*;
