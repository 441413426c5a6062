//! Event repository — stateless SQL over the `events` table.
//!
//! Every method takes `&Connection` and executes a single statement, so
//! the high-level store can compose them inside one transaction where
//! atomicity matters (pairing).

use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::Result;
use crate::row_types::{EventKind, EventRow};

const COLUMNS: &str = "id, type, file_path, timestamp, matched_with, payload";

/// Stateless repository over the `events` table.
pub struct EventRepo;

impl EventRepo {
    /// Insert a row, ignoring duplicates by primary key.
    ///
    /// Returns `true` if a new row was inserted, `false` if the id already
    /// existed (the intentional idempotency no-op).
    pub fn insert_or_ignore(conn: &Connection, row: &EventRow) -> Result<bool> {
        let changed = conn.execute(
            "INSERT OR IGNORE INTO events (id, type, file_path, timestamp, matched_with, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                row.id,
                row.kind,
                row.file_path,
                row.timestamp_ns,
                row.matched_with,
                row.payload,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Get a single event by id.
    pub fn get_by_id(conn: &Connection, event_id: &str) -> Result<Option<EventRow>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM events WHERE id = ?1"),
                params![event_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Unmatched rows of the given kind with timestamp in `[since, until]`,
    /// ascending by timestamp. Served by the partial unmatched index.
    pub fn query_unmatched(
        conn: &Connection,
        kind: EventKind,
        since_ns: i64,
        until_ns: i64,
    ) -> Result<Vec<EventRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM events
             WHERE type = ?1 AND matched_with IS NULL
               AND timestamp >= ?2 AND timestamp <= ?3
             ORDER BY timestamp ASC"
        ))?;
        let rows = stmt
            .query_map(params![kind.as_str(), since_ns, until_ns], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Set `matched_with` on a single row, only if it is still unmatched.
    ///
    /// Returns the number of rows changed (0 means missing or already
    /// matched — the caller decides which).
    pub fn mark_matched(conn: &Connection, event_id: &str, other_id: &str) -> Result<usize> {
        let changed = conn.execute(
            "UPDATE events SET matched_with = ?2 WHERE id = ?1 AND matched_with IS NULL",
            params![event_id, other_id],
        )?;
        Ok(changed)
    }

    /// Check whether an event id exists.
    pub fn exists(conn: &Connection, event_id: &str) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1)",
            params![event_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Count events of one kind.
    pub fn count_by_kind(conn: &Connection, kind: EventKind) -> Result<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM events WHERE type = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
        Ok(EventRow {
            id: row.get(0)?,
            kind: row.get(1)?,
            file_path: row.get(2)?,
            timestamp_ns: row.get(3)?,
            matched_with: row.get(4)?,
            payload: row.get(5)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
