//! The [`CorrelationEngine`] — window queries, suffix filtering, and
//! closest-delta candidate selection.
//!
//! Candidate selection is deterministic: smallest absolute timestamp delta
//! wins; ties break to the earliest timestamp, then to the
//! lexicographically smallest id. The window test is inclusive — an event
//! exactly `match_window` away matches, one nanosecond further does not.

use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::debug;

use intent_core::{path_suffix_match, AgentEvent, FileEvent, ProvenanceRecord};
use intent_store::{EventKind, EventRow, EventStore, StoreError};

use crate::config::{default_db_path, EngineConfig};
use crate::errors::{EngineError, Result};

/// Correlates file events with agent events through the store.
pub struct CorrelationEngine {
    store: EventStore,
    window_ns: i64,
}

impl CorrelationEngine {
    /// Open the engine with the given configuration.
    ///
    /// Fails if the database cannot be opened — construction-time failures
    /// are fatal to starting the subsystem.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let path = config.db_path.unwrap_or_else(default_db_path);
        let store = EventStore::open(&path)?;
        Ok(Self::with_store(store, config.match_window))
    }

    /// Build an engine over an already-opened store (used by tests).
    #[must_use]
    pub fn with_store(store: EventStore, match_window: Duration) -> Self {
        let window_ns = i64::try_from(match_window.as_nanos()).unwrap_or(i64::MAX);
        Self { store, window_ns }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Persist a file event and try to pair it with an unmatched agent
    /// event inside the match window.
    ///
    /// Returns `Ok(None)` when no counterpart matches — that is the normal
    /// result, not an error. Re-pushing an id that was already matched is a
    /// no-op returning `None`.
    pub fn push_file_event(&self, event: &FileEvent) -> Result<Option<ProvenanceRecord>> {
        event.validate()?;
        let _ = self.store.push_file_event(event)?;
        let row = self.require_row(&event.id)?;
        if row.matched_with.is_some() {
            debug!(id = %row.id, "file event already matched, skipping correlation");
            return Ok(None);
        }

        let Some(candidate) = self.find_counterpart(&row, EventKind::Agent)? else {
            return Ok(None);
        };
        self.store.set_matched_with(&row.id, &candidate.id)?;
        debug!(file_id = %row.id, agent_id = %candidate.id, "correlated file event with agent event");

        let file: FileEvent = deserialize_payload(&row)?;
        let agent: AgentEvent = deserialize_payload(&candidate)?;
        Ok(Some(build_record(&file, &agent)))
    }

    /// Persist an agent event and try to pair it with an unmatched file
    /// event inside the match window. Symmetric to [`push_file_event`](Self::push_file_event).
    pub fn push_agent_event(&self, event: &AgentEvent) -> Result<Option<ProvenanceRecord>> {
        event.validate()?;
        let _ = self.store.push_agent_event(event)?;
        let row = self.require_row(&event.id)?;
        if row.matched_with.is_some() {
            debug!(id = %row.id, "agent event already matched, skipping correlation");
            return Ok(None);
        }

        let Some(candidate) = self.find_counterpart(&row, EventKind::File)? else {
            return Ok(None);
        };
        self.store.set_matched_with(&row.id, &candidate.id)?;
        debug!(agent_id = %row.id, file_id = %candidate.id, "correlated agent event with file event");

        let file: FileEvent = deserialize_payload(&candidate)?;
        let agent: AgentEvent = deserialize_payload(&row)?;
        Ok(Some(build_record(&file, &agent)))
    }

    fn require_row(&self, id: &str) -> Result<EventRow> {
        Ok(self
            .store
            .get_event(id)?
            .ok_or_else(|| StoreError::EventNotFound(id.to_string()))?)
    }

    /// Best unmatched counterpart for `row`, or `None`.
    ///
    /// Queries only `[t - window, t + window]` so the lookup stays
    /// proportional to the window, not to total history.
    fn find_counterpart(&self, row: &EventRow, counterpart: EventKind) -> Result<Option<EventRow>> {
        let since = row.timestamp_ns.saturating_sub(self.window_ns);
        let until = row.timestamp_ns.saturating_add(self.window_ns);
        let candidates = self.store.query_unmatched(counterpart, since, until)?;

        let mut best: Option<EventRow> = None;
        for candidate in candidates {
            let (file_path, agent_path) = match counterpart {
                EventKind::Agent => (row.file_path.as_str(), candidate.file_path.as_str()),
                EventKind::File => (candidate.file_path.as_str(), row.file_path.as_str()),
            };
            if !path_suffix_match(file_path, agent_path) {
                continue;
            }
            let delta = (candidate.timestamp_ns - row.timestamp_ns).abs();
            if delta > self.window_ns {
                continue;
            }

            let better = match &best {
                None => true,
                Some(current) => {
                    let current_delta = (current.timestamp_ns - row.timestamp_ns).abs();
                    delta < current_delta
                        || (delta == current_delta
                            && (candidate.timestamp_ns, candidate.id.as_str())
                                < (current.timestamp_ns, current.id.as_str()))
                }
            };
            if better {
                best = Some(candidate);
            }
        }
        Ok(best)
    }
}

fn deserialize_payload<T: DeserializeOwned>(row: &EventRow) -> Result<T> {
    serde_json::from_str(&row.payload).map_err(|source| EngineError::CorruptPayload {
        id: row.id.clone(),
        source,
    })
}

fn build_record(file: &FileEvent, agent: &AgentEvent) -> ProvenanceRecord {
    ProvenanceRecord {
        path: file.path.clone(),
        change_type: file.change_type,
        timestamp: file.timestamp,
        session_id: agent.session_id.clone(),
        exchange_id: agent.exchange_id.clone(),
        agent_type: agent.agent_type.clone(),
        agent_model: agent.agent_model.clone(),
        message_id: agent.message_id.clone(),
        actor_host: agent.actor_host.clone(),
        actor_username: agent.actor_username.clone(),
        matched_at: Utc::now(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
