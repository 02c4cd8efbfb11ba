use crate::id::SessionId;
use crate::trace::{self, TraceEntry};
use std::marker::PhantomData;

/// Snapshot of a thread's session id, taken when work is handed off.
///
/// This is the explicit carrier for code that moves work between threads by
/// hand; the task and future wrappers in this module are built on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedContext {
    captured: Option<TraceEntry>,
}

impl CapturedContext {
    /// Snapshot the calling thread's context
    pub fn capture() -> Self {
        Self {
            captured: trace::entry(),
        }
    }

    /// A carrier for an id obtained elsewhere
    pub fn of(id: SessionId) -> Self {
        Self::from_entry(TraceEntry::untagged(id))
    }

    /// A carrier for a slot entry, owner tag included
    pub fn from_entry(entry: TraceEntry) -> Self {
        Self {
            captured: Some(entry),
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.captured.as_ref().map(TraceEntry::id)
    }

    pub fn is_empty(&self) -> bool {
        self.captured.is_none()
    }

    /// Install the captured id on the calling thread until the returned
    /// guard is dropped, at which point the thread's previous id is put back.
    pub fn transmit(&self) -> TransmitGuard {
        let residual = trace::replace_entry(self.captured.clone());
        tracing::trace!(
            captured = ?self.captured,
            residual = ?residual,
            "trace context transmitted"
        );
        TransmitGuard {
            residual,
            _not_send: PhantomData,
        }
    }
}

/// Restores a thread's residual session id on drop.
///
/// Not `Send`: it must be dropped on the thread whose slot it changed.
#[must_use = "the captured context is only active while the guard is alive"]
#[derive(Debug)]
pub struct TransmitGuard {
    residual: Option<TraceEntry>,
    _not_send: PhantomData<*const ()>,
}

impl TransmitGuard {
    /// Id that will be restored when the guard drops
    pub fn residual(&self) -> Option<&SessionId> {
        self.residual.as_ref().map(TraceEntry::id)
    }
}

impl Drop for TransmitGuard {
    fn drop(&mut self) {
        trace::replace_entry(self.residual.take());
    }
}
