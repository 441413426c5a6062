//! High-level [`EventStore`] API.
//!
//! Validates, normalizes, and serializes events before persistence, and
//! wraps the symmetric pairing update in a single transaction so callers
//! never observe a one-sided match. Duplicate-id pushes are silent
//! successes — this is what makes re-processing a source log after a crash
//! safe.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use intent_core::{AgentEvent, FileEvent};

use crate::connection::{self, ConnectionConfig, ConnectionPool, PooledConnection};
use crate::errors::{Result, StoreError};
use crate::migrations::run_migrations;
use crate::repository::EventRepo;
use crate::row_types::{EventKind, EventRow};

/// Convert an event timestamp to integer nanoseconds since the epoch.
///
/// # Errors
///
/// Returns [`StoreError::TimestampOutOfRange`] for timestamps outside the
/// representable i64 nanosecond range (~1677–2262).
pub fn timestamp_ns(ts: DateTime<Utc>) -> Result<i64> {
    ts.timestamp_nanos_opt()
        .ok_or_else(|| StoreError::TimestampOutOfRange(ts.to_rfc3339()))
}

/// Durable, idempotent storage of correlation events and pairing state.
pub struct EventStore {
    pool: ConnectionPool,
}

impl EventStore {
    /// Open (creating if absent) the database at `path` and run migrations.
    ///
    /// Parent directories are created as needed. WAL mode and the busy
    /// timeout are applied per connection, so cooperating processes on the
    /// same file retry on lock contention instead of erroring out.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let pool = connection::new_file(path, &ConnectionConfig::default())?;
        let store = Self { pool };
        let _ = run_migrations(&*store.conn()?)?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn in_memory() -> Result<Self> {
        let pool = connection::new_in_memory(&ConnectionConfig::default())?;
        let store = Self { pool };
        let _ = run_migrations(&*store.conn()?)?;
        Ok(store)
    }

    /// Release the store's connections.
    ///
    /// Dropping the store has the same effect; this exists for callers who
    /// want the teardown to be explicit.
    pub fn close(self) {
        drop(self);
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    /// Persist a file event. Returns `true` if a new row was written,
    /// `false` for a duplicate-id no-op.
    pub fn push_file_event(&self, event: &FileEvent) -> Result<bool> {
        event.validate()?;
        let row = EventRow {
            id: event.id.clone(),
            kind: EventKind::File.as_str().to_string(),
            file_path: event.path.clone(),
            timestamp_ns: timestamp_ns(event.timestamp)?,
            matched_with: None,
            payload: serde_json::to_string(event)?,
        };
        let inserted = EventRepo::insert_or_ignore(&*self.conn()?, &row)?;
        if !inserted {
            debug!(id = %event.id, "duplicate file event id, insert ignored");
        }
        Ok(inserted)
    }

    /// Persist an agent event. The comparison key is the normalized path;
    /// the payload keeps the original. Returns `true` if a new row was
    /// written, `false` for a duplicate-id no-op.
    pub fn push_agent_event(&self, event: &AgentEvent) -> Result<bool> {
        event.validate()?;
        let row = EventRow {
            id: event.id.clone(),
            kind: EventKind::Agent.as_str().to_string(),
            file_path: event.normalized_path(),
            timestamp_ns: timestamp_ns(event.timestamp)?,
            matched_with: None,
            payload: serde_json::to_string(event)?,
        };
        let inserted = EventRepo::insert_or_ignore(&*self.conn()?, &row)?;
        if !inserted {
            debug!(id = %event.id, "duplicate agent event id, insert ignored");
        }
        Ok(inserted)
    }

    /// Fetch a single event row by id.
    pub fn get_event(&self, event_id: &str) -> Result<Option<EventRow>> {
        EventRepo::get_by_id(&*self.conn()?, event_id)
    }

    /// Unmatched rows of `kind` with timestamp in `[since_ns, until_ns]`,
    /// ascending by timestamp.
    pub fn query_unmatched(
        &self,
        kind: EventKind,
        since_ns: i64,
        until_ns: i64,
    ) -> Result<Vec<EventRow>> {
        EventRepo::query_unmatched(&*self.conn()?, kind, since_ns, until_ns)
    }

    /// Atomically pair two events: each row's `matched_with` is set to the
    /// other's id in one transaction.
    ///
    /// # Errors
    ///
    /// Fails with [`StoreError::EventNotFound`] or
    /// [`StoreError::AlreadyMatched`] without writing anything — a partial
    /// failure never leaves a one-sided match.
    pub fn set_matched_with(&self, id_a: &str, id_b: &str) -> Result<()> {
        if id_a == id_b {
            return Err(StoreError::InvalidOperation(format!(
                "cannot match event {id_a} with itself"
            )));
        }

        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        for (id, other) in [(id_a, id_b), (id_b, id_a)] {
            let row = EventRepo::get_by_id(&tx, id)?
                .ok_or_else(|| StoreError::EventNotFound(id.to_string()))?;
            if row.matched_with.is_some() {
                return Err(StoreError::AlreadyMatched(id.to_string()));
            }
            if EventRepo::mark_matched(&tx, id, other)? == 0 {
                return Err(StoreError::AlreadyMatched(id.to_string()));
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Whether an event id exists.
    pub fn exists(&self, event_id: &str) -> Result<bool> {
        EventRepo::exists(&*self.conn()?, event_id)
    }

    /// Count events of one kind.
    pub fn count_events(&self, kind: EventKind) -> Result<i64> {
        EventRepo::count_by_kind(&*self.conn()?, kind)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
