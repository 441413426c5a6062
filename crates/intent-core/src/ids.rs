//! Event id generation.
//!
//! File events get a fresh UUID v7 (time-ordered) id at detection time.
//! Agent events get a deterministic SHA-256 id derived from their source
//! coordinates, so re-processing the same session log after a crash always
//! re-derives the same id and the store's duplicate-id no-op makes the
//! replay safe.

use sha2::{Digest, Sha256};
use std::fmt::Write;
use uuid::Uuid;

/// Generate a fresh file-event id (UUID v7, time-ordered).
#[must_use]
pub fn new_file_event_id() -> String {
    format!("fev_{}", Uuid::now_v7())
}

/// Derive the deterministic id for an agent event.
///
/// The id is the hex SHA-256 of `(session_id, exchange_id, message_id,
/// path)` joined with a separator that cannot appear in ids. Re-deriving
/// with the same inputs always yields the same id.
#[must_use]
pub fn derive_agent_event_id(
    session_id: &str,
    exchange_id: &str,
    message_id: &str,
    path: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(exchange_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(message_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(path.as_bytes());

    let digest = hasher.finalize();
    let mut out = String::with_capacity(4 + digest.len() * 2);
    out.push_str("aev_");
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_event_ids_are_unique() {
        let a = new_file_event_id();
        let b = new_file_event_id();
        assert_ne!(a, b);
        assert!(a.starts_with("fev_"));
    }

    #[test]
    fn agent_event_id_is_deterministic() {
        let a = derive_agent_event_id("s1", "e1", "m1", "src/main.go");
        let b = derive_agent_event_id("s1", "e1", "m1", "src/main.go");
        assert_eq!(a, b);
        assert!(a.starts_with("aev_"));
    }

    #[test]
    fn agent_event_id_varies_with_each_input() {
        let base = derive_agent_event_id("s1", "e1", "m1", "p");
        assert_ne!(base, derive_agent_event_id("s2", "e1", "m1", "p"));
        assert_ne!(base, derive_agent_event_id("s1", "e2", "m1", "p"));
        assert_ne!(base, derive_agent_event_id("s1", "e1", "m2", "p"));
        assert_ne!(base, derive_agent_event_id("s1", "e1", "m1", "q"));
    }

    #[test]
    fn agent_event_id_field_boundaries_are_unambiguous() {
        // "ab" + "c" must not collide with "a" + "bc"
        let a = derive_agent_event_id("ab", "c", "m", "p");
        let b = derive_agent_event_id("a", "bc", "m", "p");
        assert_ne!(a, b);
    }
}
