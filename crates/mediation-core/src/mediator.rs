//! Record/replay decisions around downstream calls

use crate::category::MockCategory;
use crate::collaborator::{RecordSink, ReplayLookup};
use crate::descriptor::CallDescriptor;
use crate::error::Result;
use crate::ignore::IgnoreList;
use crate::payload::{Outcome, Payload};
use rewind_context_core::{ContextManager, Session};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A downstream call about to be made by an instrumentation call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub category: MockCategory,
    pub operation: String,
    pub request: Payload,
}

impl Call {
    pub fn new(category: MockCategory, operation: impl Into<String>, request: Payload) -> Self {
        Self {
            category,
            operation: operation.into(),
            request,
        }
    }

    /// Call whose request is encoded as JSON
    pub fn json<T: Serialize + ?Sized>(
        category: MockCategory,
        operation: impl Into<String>,
        request: &T,
    ) -> Result<Self> {
        Ok(Self::new(category, operation, Payload::json(request)?))
    }
}

/// What replaying found for a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResult {
    ignored: bool,
    outcome: Option<Outcome>,
}

impl MockResult {
    pub fn new(ignored: bool, outcome: Option<Outcome>) -> Self {
        Self { ignored, outcome }
    }

    /// The operation is ignore-listed; the real call must run
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn into_outcome(self) -> Option<Outcome> {
        self.outcome
    }

    /// The recorded outcome replaces the real call
    pub fn should_short_circuit(&self) -> bool {
        !self.ignored && self.outcome.is_some()
    }
}

/// Hooks run by call sites before and after a downstream call.
///
/// Decisions follow the mode of the calling thread's session. Outside a
/// session every hook is a no-op. Store failures never change what the
/// call site observes: a failed lookup lets the real call run and a failed
/// record is only logged.
pub struct CallMediator {
    contexts: Arc<ContextManager>,
    lookup: Arc<dyn ReplayLookup>,
    sink: Arc<dyn RecordSink>,
    ignore: IgnoreList,
}

impl CallMediator {
    pub fn new(
        contexts: Arc<ContextManager>,
        lookup: Arc<dyn ReplayLookup>,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            contexts,
            lookup,
            sink,
            ignore: IgnoreList::default(),
        }
    }

    pub fn with_ignore_list(mut self, ignore: IgnoreList) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn contexts(&self) -> &Arc<ContextManager> {
        &self.contexts
    }

    pub fn ignore_list(&self) -> &IgnoreList {
        &self.ignore
    }

    /// Pre-call hook.
    ///
    /// Returns `None` unless the current session is replaying and the
    /// lookup succeeded. Check [`MockResult::should_short_circuit`] before
    /// substituting the outcome.
    pub fn before(&self, call: &Call) -> Option<MockResult> {
        let session = self.contexts.current()?;
        self.replay_lookup(&session, call)
    }

    /// Post-call hook, only for calls that were not short-circuited.
    ///
    /// Hands the outcome to the record sink when the current session is
    /// recording.
    pub fn after(&self, call: &Call, outcome: Outcome) {
        if let Some(session) = self.contexts.current() {
            self.record(&session, call, outcome);
        }
    }

    /// Run `invoke` under record/replay mediation.
    ///
    /// While replaying, a recorded success is returned as `Ok` and a recorded
    /// failure as `Err` without calling `invoke`. A recording that does not
    /// decode into `T`/`E` is skipped. While recording, the real result is
    /// stored before being returned.
    pub fn mediate<T, E, F>(&self, call: &Call, invoke: F) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: Serialize + DeserializeOwned,
        F: FnOnce() -> std::result::Result<T, E>,
    {
        match self.contexts.current() {
            Some(session) => self.mediate_in(&session, call, invoke),
            None => invoke(),
        }
    }

    /// [`mediate`](Self::mediate) with a request encoded as JSON only once a
    /// session is active.
    ///
    /// Outside a session the request is never encoded. A request that fails
    /// to encode is logged and the real call runs unmediated.
    pub fn mediate_json<R, T, E, F>(
        &self,
        category: MockCategory,
        operation: &str,
        request: &R,
        invoke: F,
    ) -> std::result::Result<T, E>
    where
        R: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        E: Serialize + DeserializeOwned,
        F: FnOnce() -> std::result::Result<T, E>,
    {
        let Some(session) = self.contexts.current() else {
            return invoke();
        };
        let call = match Call::json(category, operation, request) {
            Ok(call) => call,
            Err(err) => {
                warn!(
                    session_id = %session.id(),
                    operation,
                    error = %err,
                    "failed to encode call request, running the call unmediated"
                );
                return invoke();
            }
        };
        self.mediate_in(&session, &call, invoke)
    }

    fn mediate_in<T, E, F>(&self, session: &Session, call: &Call, invoke: F) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: Serialize + DeserializeOwned,
        F: FnOnce() -> std::result::Result<T, E>,
    {
        if session.is_replay() {
            if let Some(mock) = self.replay_lookup(session, call) {
                if mock.should_short_circuit() {
                    if let Some(replayed) = self.decode_replayed(call, mock) {
                        return replayed;
                    }
                }
            }
            return invoke();
        }

        let result = invoke();
        match Outcome::from_result(&result) {
            Ok(outcome) => self.record(session, call, outcome),
            Err(err) => warn!(
                session_id = %session.id(),
                category = %call.category,
                operation = %call.operation,
                error = %err,
                "failed to encode call result"
            ),
        }
        result
    }

    fn replay_lookup(&self, session: &Session, call: &Call) -> Option<MockResult> {
        if !session.is_replay() {
            return None;
        }

        let descriptor = CallDescriptor::for_session(
            session,
            call.category.clone(),
            call.operation.as_str(),
            call.request.clone(),
        );
        let outcome = match self.lookup.lookup(&descriptor) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    session_id = %session.id(),
                    category = %call.category,
                    operation = %call.operation,
                    error = %err,
                    "replay lookup failed, running the real call"
                );
                return None;
            }
        };
        let ignored = self.ignore.is_ignored(&call.category, &call.operation);

        debug!(
            session_id = %session.id(),
            category = %call.category,
            operation = %call.operation,
            found = outcome.is_some(),
            ignored,
            "replay lookup"
        );
        Some(MockResult::new(ignored, outcome))
    }

    fn record(&self, session: &Session, call: &Call, outcome: Outcome) {
        if !session.is_record() {
            return;
        }

        let descriptor = CallDescriptor::for_session(
            session,
            call.category.clone(),
            call.operation.as_str(),
            call.request.clone(),
        )
        .with_response(outcome);
        if let Err(err) = self.sink.record(descriptor) {
            warn!(
                session_id = %session.id(),
                category = %call.category,
                operation = %call.operation,
                error = %err,
                "failed to record call"
            );
        }
    }

    fn decode_replayed<T, E>(&self, call: &Call, mock: MockResult) -> Option<std::result::Result<T, E>>
    where
        T: DeserializeOwned,
        E: DeserializeOwned,
    {
        let outcome = mock.into_outcome()?;
        match outcome.decode() {
            Ok(result) => Some(result),
            Err(err) => {
                warn!(
                    category = %call.category,
                    operation = %call.operation,
                    error = %err,
                    "recorded outcome does not decode, running the real call"
                );
                None
            }
        }
    }
}

impl fmt::Debug for CallMediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallMediator")
            .field("contexts", &self.contexts)
            .field("ignore", &self.ignore)
            .finish_non_exhaustive()
    }
}
