//! Event and record types.
//!
//! [`FileEvent`] and [`AgentEvent`] are the two inputs to correlation;
//! [`ProvenanceRecord`] is the output. Events are serialized whole into the
//! store's payload column and reconstructed on match, so the wire format
//! here is intentionally decoupled from the SQL schema — adding a field to
//! an event does not change the on-disk schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::paths::normalize_agent_path;

/// The kind of filesystem change a [`FileEvent`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileChangeType {
    /// A new file appeared.
    Create,
    /// An existing file's contents changed.
    Modify,
    /// A file was removed.
    Delete,
    /// A file was renamed.
    Rename,
}

impl FileChangeType {
    /// Stable string form used in logs and records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Modify => "modify",
            Self::Delete => "delete",
            Self::Rename => "rename",
        }
    }
}

/// The kind of file operation an [`AgentEvent`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentChangeType {
    /// The agent created the file.
    Create,
    /// The agent edited part of the file.
    Edit,
    /// The agent wrote the file whole.
    Write,
    /// The agent deleted the file.
    Delete,
}

impl AgentChangeType {
    /// Stable string form used in logs and records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Write => "write",
            Self::Delete => "delete",
        }
    }
}

/// A filesystem change detected by the watcher or any other producer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEvent {
    /// Caller-assigned unique id (idempotency key).
    pub id: String,
    /// Absolute path, forward-slash delimited.
    pub path: String,
    /// What kind of change happened.
    pub change_type: FileChangeType,
    /// When the file actually changed (modification time, not detection time).
    pub timestamp: DateTime<Utc>,
}

impl FileEvent {
    /// Validate required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the id is empty or the path is not
    /// absolute.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        if self.path.is_empty() {
            return Err(ValidationError::MissingField("path"));
        }
        if !self.path.starts_with('/') {
            return Err(ValidationError::RelativePath(self.path.clone()));
        }
        Ok(())
    }
}

/// A file operation reported by an AI agent interaction.
///
/// `file_path` is kept exactly as the agent reported it; use
/// [`normalized_path`](Self::normalized_path) for storage and matching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentEvent {
    /// Deterministic id derived from (session, exchange, message, path).
    pub id: String,
    /// Path as reported by the agent — may be relative or absolute.
    pub file_path: String,
    /// What kind of operation the agent performed.
    pub change_type: AgentChangeType,
    /// When the agent performed the operation.
    pub timestamp: DateTime<Utc>,
    /// Session the operation belongs to.
    pub session_id: String,
    /// Exchange (prompt/response round) within the session.
    pub exchange_id: String,
    /// Message carrying the tool invocation, if known.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message_id: String,
    /// Which agent produced this (e.g. `claude-code`).
    pub agent_type: String,
    /// Model identifier, if the log recorded one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub agent_model: String,
    /// Hostname of the machine the agent ran on.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub actor_host: String,
    /// Username the agent ran as.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub actor_username: String,
}

impl AgentEvent {
    /// Validate required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if id, file path, session id,
    /// exchange id, or agent type is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id"));
        }
        if self.file_path.is_empty() {
            return Err(ValidationError::MissingField("file_path"));
        }
        if self.session_id.is_empty() {
            return Err(ValidationError::MissingField("session_id"));
        }
        if self.exchange_id.is_empty() {
            return Err(ValidationError::MissingField("exchange_id"));
        }
        if self.agent_type.is_empty() {
            return Err(ValidationError::MissingField("agent_type"));
        }
        Ok(())
    }

    /// The normalized form of `file_path` used for storage and matching.
    #[must_use]
    pub fn normalized_path(&self) -> String {
        normalize_agent_path(&self.file_path)
    }
}

/// The correlation output: this file changed, and this agent interaction
/// caused it.
///
/// Built fresh on every successful match, never mutated, and not persisted
/// by this subsystem — downstream consumers own its lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceRecord {
    /// Absolute filesystem path that changed.
    pub path: String,
    /// File-side change type.
    pub change_type: FileChangeType,
    /// When the file changed.
    pub timestamp: DateTime<Utc>,
    /// Session that caused the change.
    pub session_id: String,
    /// Exchange within the session.
    pub exchange_id: String,
    /// Which agent caused the change.
    pub agent_type: String,
    /// Model identifier, if known.
    pub agent_model: String,
    /// Message carrying the tool invocation, if known.
    pub message_id: String,
    /// Hostname of the machine the agent ran on.
    pub actor_host: String,
    /// Username the agent ran as.
    pub actor_username: String,
    /// Wall-clock time the correlation was made.
    pub matched_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
