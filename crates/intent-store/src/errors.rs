//! Error types for the event store.
//!
//! [`StoreError`] is the primary error type returned by all store
//! operations. The store never swallows an error silently — the one
//! intentional exception is the duplicate-id no-op on insert, which is a
//! success, not an error.

use thiserror::Error;

/// Errors that can occur during event store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// JSON serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Filesystem error while preparing the database location.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Describes which migration failed and why.
        message: String,
    },

    /// Event failed validation before persistence.
    #[error("validation error: {0}")]
    Validation(#[from] intent_core::ValidationError),

    /// Requested event was not found.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// Attempted to pair an event that is already matched.
    #[error("event already matched: {0}")]
    AlreadyMatched(String),

    /// Invalid operation on the store.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Event timestamp cannot be represented as integer nanoseconds.
    #[error("timestamp out of range: {0}")]
    TimestampOutOfRange(String),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
