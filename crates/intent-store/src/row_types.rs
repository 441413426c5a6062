//! Raw database row structs and the event-kind discriminator.

/// Which side of a correlation an event row belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A filesystem change (`file_event`).
    File,
    /// An agent-reported operation (`agent_event`).
    Agent,
}

impl EventKind {
    /// The `type` column value for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file_event",
            Self::Agent => "agent_event",
        }
    }

    /// The opposite side — what this kind matches against.
    #[must_use]
    pub fn counterpart(self) -> Self {
        match self {
            Self::File => Self::Agent,
            Self::Agent => Self::File,
        }
    }
}

/// A raw row from the `events` table.
#[derive(Clone, Debug, PartialEq)]
pub struct EventRow {
    /// Event id (primary key).
    pub id: String,
    /// Discriminator: `file_event` or `agent_event`.
    pub kind: String,
    /// Comparison key — normalized for agent events, as-given for file events.
    pub file_path: String,
    /// Event time as integer nanoseconds since the Unix epoch.
    pub timestamp_ns: i64,
    /// Id of the paired event, or `None` while unmatched.
    pub matched_with: Option<String>,
    /// Full serialized original event.
    pub payload: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
