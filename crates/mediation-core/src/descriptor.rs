//! Call descriptors exchanged with the record and replay stores

use crate::category::MockCategory;
use crate::payload::{Outcome, Payload};
use rewind_context_core::Session;
use serde::{Deserialize, Serialize};

/// One downstream call as seen by the record and replay stores.
///
/// `record_id` is the id of the recording session the call belongs to:
/// the session's own id while recording, the replayed recording's id
/// while replaying. `replay_id` is only set while replaying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDescriptor {
    pub category: MockCategory,
    pub operation_name: String,
    pub record_id: String,
    pub replay_id: Option<String>,
    pub request: Payload,
    pub response: Option<Outcome>,
}

/// The part of a descriptor that identifies a call across record and replay
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DescriptorKey {
    pub record_id: String,
    pub category: MockCategory,
    pub operation_name: String,
    pub request: Payload,
}

impl CallDescriptor {
    /// Describe a call made inside `session`
    pub fn for_session(
        session: &Session,
        category: MockCategory,
        operation_name: impl Into<String>,
        request: Payload,
    ) -> Self {
        Self {
            category,
            operation_name: operation_name.into(),
            record_id: session.record_id().to_string(),
            replay_id: session.replay_id().map(|id| id.to_string()),
            request,
            response: None,
        }
    }

    pub fn with_response(mut self, response: Outcome) -> Self {
        self.response = Some(response);
        self
    }

    /// Lookup key. Equal for logically identical calls of the same recording.
    pub fn key(&self) -> DescriptorKey {
        DescriptorKey {
            record_id: self.record_id.clone(),
            category: self.category.clone(),
            operation_name: self.operation_name.clone(),
            request: self.request.clone(),
        }
    }
}
