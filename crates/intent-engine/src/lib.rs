//! # intent-engine
//!
//! The correlation engine: owns the time-window matching policy and turns
//! a matched (file event, agent event) pair into a [`intent_core::ProvenanceRecord`].
//!
//! Matching is commutative — `push_file_event` and `push_agent_event` run
//! the identical window + path-suffix + closest-delta algorithm against
//! whichever side is missing, so the pairing is the same regardless of
//! arrival order. Whichever event arrives second wins the match.
//!
//! Also hosts the thin [`adapter`] boundary that turns provider-agnostic
//! session records into agent events.

#![deny(unsafe_code)]

pub mod adapter;
pub mod config;
pub mod engine;
pub mod errors;

pub use adapter::{AgentFileOperation, AgentSessionRecord};
pub use config::EngineConfig;
pub use engine::CorrelationEngine;
pub use errors::{EngineError, Result};
