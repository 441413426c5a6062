//! Error types for the filesystem watcher.
//!
//! Construction and start-time failures surface here and are fatal to the
//! watcher. Per-event failures during steady state are logged and dropped
//! instead — one missed file event must not halt observation of the rest
//! of the tree.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up or stopping the watcher.
#[derive(Debug, Error)]
pub enum WatcherError {
    /// The watch root could not be resolved.
    #[error("cannot canonicalize watch root {path}: {source}")]
    BadRoot {
        /// The configured root.
        path: PathBuf,
        /// Underlying io error.
        #[source]
        source: std::io::Error,
    },

    /// OS-level watch registration failed.
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    /// Filesystem error during directory traversal.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for watcher results.
pub type Result<T> = std::result::Result<T, WatcherError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
