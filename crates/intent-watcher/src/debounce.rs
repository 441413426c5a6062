//! Per-path debouncing.
//!
//! Editors commonly produce several raw notifications for one logical save
//! (truncate, write, write again). The debouncer collapses notifications
//! for the same path arriving within a short window into one event.
//!
//! The map is touched by the single watch task today; the mutex keeps the
//! design safe if concurrency is later increased.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Default debounce window.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Collapses rapid duplicate notifications for the same path.
pub struct Debouncer {
    window: Duration,
    last_seen: Mutex<HashMap<PathBuf, Instant>>,
}

impl Debouncer {
    /// Create a debouncer with the given window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Record a notification for `path` and decide whether to emit it.
    ///
    /// Returns `false` when the same path produced an event less than the
    /// window ago; `true` otherwise, stamping the path as seen now.
    pub fn should_emit(&self, path: &Path) -> bool {
        let now = Instant::now();
        let mut map = self.last_seen.lock();
        if let Some(prev) = map.get(path) {
            if now.duration_since(*prev) < self.window {
                return false;
            }
        }
        let _ = map.insert(path.to_path_buf(), now);
        true
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_WINDOW)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
