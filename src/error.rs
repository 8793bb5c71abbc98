//! Error taxonomy shared by the store and the HTTP layer

use thiserror::Error;

/// Errors produced by studytrack operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required field was absent or empty
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// The acting user may not perform the operation
    #[error("{0}")]
    Permission(String),

    /// The SQLite engine failed
    #[error("{0}")]
    Store(#[from] rusqlite::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for the "missing required field" validation error
    pub fn missing(field: &str) -> Self {
        Error::Validation(format!("Missing required field: {}", field))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
