//! Error types for the correlation engine.
//!
//! The engine propagates store errors unchanged and never retries — the
//! caller owns retry policy. "No match found" is not an error; it is the
//! normal absent result.

use thiserror::Error;

/// Errors that can occur during correlation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Event failed validation before persistence.
    #[error("validation error: {0}")]
    Validation(#[from] intent_core::ValidationError),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] intent_store::StoreError),

    /// A stored payload could not be deserialized back into its event.
    #[error("corrupt payload for event {id}: {source}")]
    CorruptPayload {
        /// Id of the row whose payload failed to deserialize.
        id: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for engine results.
pub type Result<T> = std::result::Result<T, EngineError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
