//! Error types for the data layer.
//!
//! [`DbError`] wraps the underlying [`sqlx`] error with the operation that
//! failed. [`SelectError`] is what the random selector reports: either the
//! table is empty or the store failed.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors from [`RandomSelector::select`](crate::random::RandomSelector::select).
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    /// The table has no rows to pick from.
    #[error("collection is empty")]
    EmptyCollection,

    /// The backing store failed.
    #[error(transparent)]
    Db(#[from] DbError),
}
