//! Agent event adapter — the provider-agnostic boundary.
//!
//! Session-log parsers (out of scope here) hand this module an
//! [`AgentSessionRecord`]; it emits one [`AgentEvent`] per completed
//! file-modifying operation with a path, deriving the event id
//! deterministically so re-processing the same source log is idempotent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use intent_core::{derive_agent_event_id, AgentChangeType, AgentEvent, ProvenanceRecord};

use crate::engine::CorrelationEngine;
use crate::errors::Result;

/// One file-modifying tool invocation inside a session exchange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFileOperation {
    /// Message carrying the tool invocation.
    pub message_id: String,
    /// Path as reported by the agent.
    pub path: String,
    /// The operation kind.
    pub change_type: AgentChangeType,
    /// When the operation happened.
    pub timestamp: DateTime<Utc>,
    /// Whether the tool invocation has a completed result.
    pub completed: bool,
}

/// A provider-agnostic parsed session exchange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSessionRecord {
    /// Session id from the source log.
    pub session_id: String,
    /// Exchange (prompt/response round) id.
    pub exchange_id: String,
    /// Which agent produced the log (e.g. `claude-code`).
    pub agent_type: String,
    /// Model identifier, if recorded.
    #[serde(default)]
    pub agent_model: String,
    /// Hostname of the machine the agent ran on.
    #[serde(default)]
    pub actor_host: String,
    /// Username the agent ran as.
    #[serde(default)]
    pub actor_username: String,
    /// File operations reported in this exchange.
    pub operations: Vec<AgentFileOperation>,
}

impl AgentSessionRecord {
    /// Turn this record into zero-or-more agent events.
    ///
    /// Only completed operations with a non-empty path produce events.
    /// Event ids are derived from (session, exchange, message, path), so
    /// converting the same record twice yields identical events.
    #[must_use]
    pub fn to_agent_events(&self) -> Vec<AgentEvent> {
        self.operations
            .iter()
            .filter(|op| op.completed && !op.path.is_empty())
            .map(|op| AgentEvent {
                id: derive_agent_event_id(
                    &self.session_id,
                    &self.exchange_id,
                    &op.message_id,
                    &op.path,
                ),
                file_path: op.path.clone(),
                change_type: op.change_type,
                timestamp: op.timestamp,
                session_id: self.session_id.clone(),
                exchange_id: self.exchange_id.clone(),
                message_id: op.message_id.clone(),
                agent_type: self.agent_type.clone(),
                agent_model: self.agent_model.clone(),
                actor_host: self.actor_host.clone(),
                actor_username: self.actor_username.clone(),
            })
            .collect()
    }
}

/// Feed every event of a session record through the engine, collecting any
/// provenance records produced.
pub fn push_session(
    engine: &CorrelationEngine,
    record: &AgentSessionRecord,
) -> Result<Vec<ProvenanceRecord>> {
    let mut matched = Vec::new();
    for event in record.to_agent_events() {
        if let Some(record) = engine.push_agent_event(&event)? {
            matched.push(record);
        }
    }
    Ok(matched)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
