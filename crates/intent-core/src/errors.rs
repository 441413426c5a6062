//! Validation errors for event construction.
//!
//! Validation rejects an event before any persistence attempt. These errors
//! always surface to the caller and are never retried internally.

use thiserror::Error;

/// Errors produced when an event fails validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A mandatory field is empty or missing.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A `FileEvent` path that does not start with `/`.
    #[error("file event path must be absolute: {0}")]
    RelativePath(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
