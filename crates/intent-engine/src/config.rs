//! Engine configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Default maximum allowed `|file_timestamp - agent_timestamp|` for a pair
/// to be considered related.
pub const DEFAULT_MATCH_WINDOW: Duration = Duration::from_secs(5);

/// Configuration for [`crate::CorrelationEngine`].
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Database path override. `None` uses [`default_db_path`].
    pub db_path: Option<PathBuf>,
    /// Maximum timestamp delta for a pair to match (inclusive).
    pub match_window: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            match_window: DEFAULT_MATCH_WINDOW,
        }
    }
}

/// Resolve the default database path (`~/.intent/intent.db`).
#[must_use]
pub fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".intent").join("intent.db")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
