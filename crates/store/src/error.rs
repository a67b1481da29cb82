//! Store errors

use thiserror::Error;

/// Errors raised by the price store
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite failed
    #[error("database: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A cached series could not be encoded or decoded
    #[error("cached series: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored timestamp is not RFC 3339
    #[error("bad timestamp {value:?}: {source}")]
    Timestamp {
        /// Stored text
        value: String,
        /// Parser error
        source: chrono::ParseError,
    },

    /// The database directory could not be created
    #[error("create {path}: {source}")]
    Directory {
        /// Directory path
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}
