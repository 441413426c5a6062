//! # intent-core
//!
//! Foundation types and primitives for the intent provenance correlation
//! subsystem.
//!
//! This crate provides the shared vocabulary that the store, engine, and
//! watcher crates depend on:
//!
//! - **Events**: [`FileEvent`] and [`AgentEvent`] with their change-type enums
//! - **Output**: [`ProvenanceRecord`] — the "this agent interaction changed
//!   this file" fact produced on a successful correlation
//! - **Paths**: normalization of agent-reported paths and the
//!   directory-boundary-aligned [`path_suffix_match`] predicate
//! - **IDs**: deterministic agent-event id derivation and fresh file-event ids
//! - **Errors**: [`ValidationError`] via `thiserror`

#![deny(unsafe_code)]

pub mod errors;
pub mod events;
pub mod ids;
pub mod paths;

pub use errors::ValidationError;
pub use events::{AgentChangeType, AgentEvent, FileChangeType, FileEvent, ProvenanceRecord};
pub use ids::{derive_agent_event_id, new_file_event_id};
pub use paths::{normalize_agent_path, path_suffix_match};
