//! Session registry
//!
//! Maps session ids to their [`Session`] and publishes lifecycle events to
//! registered [`ContextListener`]s. The registry and the listener list are
//! owned by a [`ContextManager`]; [`ContextManager::global`] is the instance
//! bound to the process-wide id generator.

use crate::errors::Result;
use crate::id::{IdGenerator, SessionId};
use crate::listener::ContextListener;
use crate::session::Session;
use crate::trace::{self, SlotOwner};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

static GLOBAL_MANAGER: Lazy<Arc<ContextManager>> =
    Lazy::new(|| Arc::new(ContextManager::new(IdGenerator::global())));

#[derive(Clone, Copy)]
enum Lifecycle<'a> {
    Created(&'a Arc<Session>),
    Completed(Option<&'a Arc<Session>>),
}

/// Coordinates the thread-local trace context with the session registry.
///
/// Ids a manager opens are tagged with its [`SlotOwner`]; another manager on
/// the same thread neither sees nor ends them.
pub struct ContextManager {
    owner: SlotOwner,
    generator: Arc<IdGenerator>,
    sessions: DashMap<SessionId, Arc<Session>>,
    listeners: RwLock<Vec<Arc<dyn ContextListener>>>,
}

impl ContextManager {
    /// Create a manager issuing ids from `generator`
    pub fn new(generator: Arc<IdGenerator>) -> Self {
        Self {
            owner: SlotOwner::unique(),
            generator,
            sessions: DashMap::new(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// The manager used by instrumentation call sites
    pub fn global() -> Arc<ContextManager> {
        GLOBAL_MANAGER.clone()
    }

    pub fn generator(&self) -> &Arc<IdGenerator> {
        &self.generator
    }

    /// Resolve the current thread's session, optionally opening one.
    ///
    /// With `create_if_absent` on a thread that has no id yet, a new id is
    /// generated, a session is registered for it (replaying `record_id` when
    /// that is non-empty) and every listener's `on_create` runs before this
    /// returns. Otherwise the registry entry for the thread's id is returned,
    /// which is `None` for an id that was never registered.
    ///
    /// Only entrance points should pass `create_if_absent = true`.
    pub fn resolve_or_create(
        &self,
        create_if_absent: bool,
        record_id: Option<&str>,
    ) -> Result<Option<Arc<Session>>> {
        let (id, fresh) = if create_if_absent {
            match trace::get_or_create_owned(&self.generator, self.owner)? {
                Some(resolved) => resolved,
                None => return Ok(None),
            }
        } else {
            match trace::get_for(self.owner) {
                Some(id) => (id, false),
                None => return Ok(None),
            }
        };

        if !fresh {
            return Ok(self.lookup(&id));
        }

        let session = Arc::new(Session::for_entrance(id.clone(), record_id));
        self.sessions.insert(id, session.clone());
        debug!(
            session_id = %session.id(),
            mode = %session.mode(),
            record_id = %session.record_id(),
            "session created"
        );
        self.publish(Lifecycle::Created(&session));
        Ok(Some(session))
    }

    /// Current thread's session without creating one
    pub fn current(&self) -> Option<Arc<Session>> {
        trace::get_for(self.owner).and_then(|id| self.lookup(&id))
    }

    /// Raw registry read, bypassing the thread-local context
    pub fn lookup(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// Downstream results should be captured
    pub fn is_recording(&self) -> bool {
        self.current().is_some_and(|session| session.is_record())
    }

    /// Downstream results should be served from a recording
    pub fn is_replaying(&self) -> bool {
        self.current().is_some_and(|session| session.is_replay())
    }

    /// The current thread is inside a registered session
    pub fn is_active(&self) -> bool {
        self.current().is_some()
    }

    /// End the current thread's unit of work.
    ///
    /// Leaves ids opened by other managers alone. Otherwise clears the
    /// thread's slot and, when it held an id, drops the registry
    /// entry and runs every listener's `on_complete` with the removed
    /// session (or `None` if the id was never registered).
    pub fn end(&self) -> Option<Arc<Session>> {
        let id = trace::remove_for(self.owner)?;
        let removed = self.sessions.remove(&id).map(|(_, session)| session);
        debug!(session_id = %id, registered = removed.is_some(), "session ended");
        self.publish(Lifecycle::Completed(removed.as_ref()));
        removed
    }

    /// Append a listener.
    ///
    /// Meant for process initialization. A listener registered while events
    /// are being published only sees events that start after registration.
    pub fn register_listener(&self, listener: Arc<dyn ContextListener>) {
        debug!(listener = listener.name(), "context listener registered");
        self.listeners.write().push(listener);
    }

    /// Number of registered sessions
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    fn publish(&self, event: Lifecycle<'_>) {
        let listeners = self.listeners.read().clone();
        for listener in &listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| match event {
                Lifecycle::Created(session) => listener.on_create(session),
                Lifecycle::Completed(session) => listener.on_complete(session),
            }));
            if outcome.is_err() {
                warn!(listener = listener.name(), "context listener panicked; continuing with the rest");
            }
        }
    }
}

impl std::fmt::Debug for ContextManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextManager")
            .field("sessions", &self.sessions.len())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}
