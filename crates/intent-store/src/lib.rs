//! # intent-store
//!
//! Durable, idempotent `SQLite` storage for correlation events.
//!
//! This is the only crate that touches disk. It stores both file events and
//! agent events in a single `events` table, discriminated by `type`, with
//! the full original event serialized into a `payload` column so the
//! counterpart can be reconstructed on a match. Pairing state lives in
//! `matched_with`, set symmetrically in one transaction.
//!
//! - **[`connection`]**: `r2d2` pool (single connection — single-writer
//!   discipline) with WAL mode and busy-timeout pragmas.
//! - **[`migrations`]**: Version-tracked schema evolution, embedded SQL.
//! - **[`repository`]**: Stateless SQL layer; every method takes
//!   `&Connection`.
//! - **[`store`]**: High-level [`EventStore`] — validate, normalize,
//!   insert-or-ignore, windowed unmatched queries, atomic pairing.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repository;
pub mod row_types;
pub mod store;

pub use errors::{Result, StoreError};
pub use row_types::{EventKind, EventRow};
pub use store::EventStore;
