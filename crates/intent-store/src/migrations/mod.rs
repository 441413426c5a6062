//! Embedded schema setup.
//!
//! The store compiles its DDL in with [`include_str!`] and brings a
//! database up to date on open: every entry newer than the recorded
//! schema version is applied in order, DDL and version row committed in
//! one transaction each. Reopening an up-to-date database applies
//! nothing, and a database written by a newer build is left untouched
//! rather than downgraded.

use rusqlite::Connection;
use tracing::info;

use crate::errors::{Result, StoreError};

/// Versioned DDL, applied in order. Append-only once released.
const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("v001_schema.sql"))];

/// Bring the schema up to date and return the resulting version.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
           version    INTEGER PRIMARY KEY,
           applied_at TEXT NOT NULL
         );",
    )
    .map_err(|e| migration_error("creating schema_version table", &e))?;

    let mut version = current_version(conn)?;
    for &(target, sql) in MIGRATIONS {
        if target <= version {
            continue;
        }
        info!(version = target, "applying schema migration");

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| migration_error(&format!("beginning migration v{target}"), &e))?;
        tx.execute_batch(sql)
            .map_err(|e| migration_error(&format!("migration v{target}"), &e))?;
        let _ = tx
            .execute(
                "INSERT INTO schema_version (version, applied_at)
                 VALUES (?1, datetime('now'))",
                [target],
            )
            .map_err(|e| migration_error(&format!("recording migration v{target}"), &e))?;
        tx.commit()
            .map_err(|e| migration_error(&format!("committing migration v{target}"), &e))?;

        version = target;
    }

    Ok(version)
}

/// The schema version recorded in the database, 0 when fresh.
pub fn current_version(conn: &Connection) -> Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| migration_error("reading schema_version", &e))
}

/// The newest version this build knows about.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |&(version, _)| version)
}

fn migration_error(context: &str, source: &dyn std::fmt::Display) -> StoreError {
    StoreError::Migration {
        message: format!("{context}: {source}"),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn fresh_database_reaches_latest_version() {
        let conn = setup();
        assert_eq!(run_migrations(&conn).unwrap(), latest_version());
        assert_eq!(current_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn rerun_is_a_no_op() {
        let conn = setup();
        let first = run_migrations(&conn).unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), first);
        assert_eq!(current_version(&conn).unwrap(), first);
    }

    #[test]
    fn newer_database_is_left_alone() {
        let conn = setup();
        let _ = run_migrations(&conn).unwrap();
        let future = latest_version() + 1;
        let _ = conn
            .execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
                [future],
            )
            .unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), future);
    }

    #[test]
    fn creates_events_table_and_partial_index() {
        let conn = setup();
        let _ = run_migrations(&conn).unwrap();

        let table: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'events'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table, 1);

        let index: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'index' AND name = 'idx_events_unmatched_type_timestamp'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn rejects_unknown_event_type() {
        let conn = setup();
        let _ = run_migrations(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO events (id, type, file_path, timestamp, payload)
             VALUES ('x', 'bogus', '/p', 0, '{}')",
            [],
        );
        assert!(result.is_err());
    }
}
