use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid schema at JSON path {path}: {message}")]
    Schema { path: String, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no schema for transaction type {tx_type} version {version}")]
    UnknownTransactionSchema { tx_type: i64, version: i64 },

    #[error("no schema for order version {version}")]
    UnknownOrderSchema { version: i64 },

    #[error("duplicate schema for transaction type {tx_type} version {version}")]
    DuplicateTransactionSchema { tx_type: i64, version: i64 },

    #[error("duplicate schema for order version {version}")]
    DuplicateOrderSchema { version: i64 },

    #[error("missing or non-integer `{0}` field")]
    MissingField(&'static str),

    #[error("nesting depth exceeds the configured limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("not an integer numeral: {0}")]
    NotANumeral(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
