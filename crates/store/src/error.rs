use thiserror::Error;

/// Errors that can occur when interacting with a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A natural-key uniqueness constraint was violated on insert.
    /// The caller treats this the same way as its idempotency pre-check.
    #[error("duplicate {key}: a record already exists for {value}")]
    DuplicateKey { key: &'static str, value: String },

    /// An update was issued against an id that does not exist.
    ///
    /// The core only updates records it just fetched, so this is a logic
    /// error rather than a normal outcome.
    #[error("no stored record with id {0}")]
    UnknownId(String),

    /// A stored status column held a code outside the closed enum.
    #[error("invalid stored status code: {0}")]
    InvalidStatus(i16),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
