//! Error types for statement execution.

use tally_sql::ParseError;
use thiserror::Error;

/// Errors raised while executing a statement against a datastore.
#[derive(Debug, Error)]
pub enum DbError {
    /// The statement starts with a recognized keyword but is malformed or
    /// uses syntax outside the dialect.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The datastore refused the request.
    #[error("datastore error: {0}")]
    Datastore(String),

    /// The HTTP transport failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A row or response body could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A bound parameter has the wrong shape for where it is used.
    #[error("invalid parameter for {context}: {message}")]
    InvalidParameter { context: String, message: String },

    /// An update or delete reached the datastore with no conditions.
    #[error("refusing unfiltered {operation} on `{table}`")]
    UnfilteredWrite { operation: &'static str, table: String },
}

/// Result type alias for execution.
pub type Result<T> = std::result::Result<T, DbError>;
