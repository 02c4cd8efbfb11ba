//! Record/replay session model

use crate::id::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a session captures real results or serves recorded ones
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum SessionMode {
    /// Real downstream results are captured for later replay
    Record,
    /// Previously captured results are substituted for downstream calls
    Replay,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Record => f.write_str("record"),
            SessionMode::Replay => f.write_str("replay"),
        }
    }
}

/// One unit of work being recorded or replayed.
///
/// The mode is decided at construction and never changes: a session built
/// with an external record id replays that recording, any other session
/// records under its own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    id: SessionId,
    record_id: String,
    mode: SessionMode,
    created_at: DateTime<Utc>,
}

impl Session {
    /// A session recording under its own id
    pub fn record(id: SessionId) -> Self {
        Self {
            record_id: id.as_str().to_string(),
            id,
            mode: SessionMode::Record,
            created_at: Utc::now(),
        }
    }

    /// A session replaying the recording `record_id`
    pub fn replay(id: SessionId, record_id: impl Into<String>) -> Self {
        Self {
            id,
            record_id: record_id.into(),
            mode: SessionMode::Replay,
            created_at: Utc::now(),
        }
    }

    /// Pick the mode for a session opened at an entrance point: replay when a
    /// non-empty record id came with the request, record otherwise.
    pub fn for_entrance(id: SessionId, record_id: Option<&str>) -> Self {
        match record_id.filter(|record_id| !record_id.is_empty()) {
            Some(record_id) => Self::replay(id, record_id),
            None => Self::record(id),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Recording this session writes to (record mode) or reads from (replay mode)
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    /// The session's own id when it replays, `None` when it records
    pub fn replay_id(&self) -> Option<&SessionId> {
        match self.mode {
            SessionMode::Replay => Some(&self.id),
            SessionMode::Record => None,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn is_record(&self) -> bool {
        self.mode == SessionMode::Record
    }

    pub fn is_replay(&self) -> bool {
        self.mode == SessionMode::Replay
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entrance_without_record_id_records_under_own_id() {
        let session = Session::for_entrance(SessionId::from("REWIND-h-17"), None);
        assert_eq!(session.mode(), SessionMode::Record);
        assert_eq!(session.record_id(), "REWIND-h-17");
        assert_eq!(session.replay_id(), None);
    }

    #[test]
    fn test_empty_record_id_counts_as_absent() {
        let session = Session::for_entrance(SessionId::from("REWIND-h-18"), Some(""));
        assert!(session.is_record());
    }

    #[test]
    fn test_entrance_with_record_id_replays() {
        let id = SessionId::from("REWIND-h-19");
        let session = Session::for_entrance(id.clone(), Some("REWIND-prod-3"));
        assert!(session.is_replay());
        assert_eq!(session.record_id(), "REWIND-prod-3");
        assert_eq!(session.replay_id(), Some(&id));
    }

    #[test]
    fn test_serializes_mode_and_ids() {
        let session = Session::record(SessionId::from("REWIND-h-20"));
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["id"], "REWIND-h-20");
        assert_eq!(json["record_id"], "REWIND-h-20");
        assert_eq!(json["mode"], "Record");
    }
}
