//! Thread-local trace context.
//!
//! Each thread holds at most one active [`SessionId`]. The slot is only read
//! or written by its own thread; the propagation bridge moves ids between
//! threads explicitly through [`CapturedContext`](crate::propagation::CapturedContext).
//!
//! An id opened by a [`ContextManager`](crate::ContextManager) is tagged with
//! that manager's [`SlotOwner`], so managers sharing a thread never read or
//! end each other's sessions. Ids assigned with [`set`] are untagged and
//! visible to every manager.

use crate::errors::Result;
use crate::id::{IdGenerator, SessionId};
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static TRACE_CONTEXT: RefCell<Option<TraceEntry>> = const { RefCell::new(None) };
}

/// Identifies the context manager that opened a slot's session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotOwner(u64);

impl SlotOwner {
    /// A key no other owner in this process shares
    pub fn unique() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Content of a thread's slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    id: SessionId,
    owner: Option<SlotOwner>,
}

impl TraceEntry {
    /// Entry visible to every manager
    pub fn untagged(id: SessionId) -> Self {
        Self { id, owner: None }
    }

    pub fn owned(id: SessionId, owner: SlotOwner) -> Self {
        Self {
            id,
            owner: Some(owner),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn owner(&self) -> Option<SlotOwner> {
        self.owner
    }

    /// Untagged entries belong to everyone
    pub fn is_visible_to(&self, owner: SlotOwner) -> bool {
        self.owner.is_none_or(|tag| tag == owner)
    }
}

/// Current thread's session id, if any
pub fn get() -> Option<SessionId> {
    TRACE_CONTEXT.with(|slot| slot.borrow().as_ref().map(|entry| entry.id.clone()))
}

/// Current thread's session id if `owner` may see it
pub fn get_for(owner: SlotOwner) -> Option<SessionId> {
    TRACE_CONTEXT.with(|slot| {
        slot.borrow()
            .as_ref()
            .filter(|entry| entry.is_visible_to(owner))
            .map(|entry| entry.id.clone())
    })
}

/// Full slot content, owner tag included
pub fn entry() -> Option<TraceEntry> {
    TRACE_CONTEXT.with(|slot| slot.borrow().clone())
}

/// Current thread's session id, generating one if the slot is empty.
///
/// Only call this at the entrance of a unit of work; anywhere else it
/// fabricates sessions for code that is not part of a request.
pub fn get_or_create(generator: &IdGenerator) -> Result<SessionId> {
    get_or_create_flagged(generator).map(|(id, _)| id)
}

/// Like [`get_or_create`], also reporting whether the id was generated by
/// this call.
pub fn get_or_create_flagged(generator: &IdGenerator) -> Result<(SessionId, bool)> {
    TRACE_CONTEXT.with(|slot| {
        if let Some(entry) = slot.borrow().as_ref() {
            return Ok((entry.id.clone(), false));
        }
        let id = generator.next()?;
        *slot.borrow_mut() = Some(TraceEntry::untagged(id.clone()));
        Ok((id, true))
    })
}

/// [`get_or_create_flagged`] on behalf of `owner`.
///
/// A freshly generated id is tagged with `owner`. Returns `Ok(None)` when the
/// slot holds an id another owner opened.
pub fn get_or_create_owned(
    generator: &IdGenerator,
    owner: SlotOwner,
) -> Result<Option<(SessionId, bool)>> {
    TRACE_CONTEXT.with(|slot| {
        if let Some(entry) = slot.borrow().as_ref() {
            if !entry.is_visible_to(owner) {
                return Ok(None);
            }
            return Ok(Some((entry.id.clone(), false)));
        }
        let id = generator.next()?;
        *slot.borrow_mut() = Some(TraceEntry::owned(id.clone(), owner));
        Ok(Some((id, true)))
    })
}

/// Force-assign `id` to the current thread, untagged
pub fn set(id: SessionId) {
    replace(Some(id));
}

/// Clear the current thread's slot, returning what it held
pub fn remove() -> Option<SessionId> {
    replace(None)
}

/// Clear the slot only if `owner` may see its id
pub fn remove_for(owner: SlotOwner) -> Option<SessionId> {
    TRACE_CONTEXT.with(|slot| {
        let mut slot = slot.borrow_mut();
        if !slot.as_ref().is_some_and(|entry| entry.is_visible_to(owner)) {
            return None;
        }
        slot.take().map(|entry| entry.id)
    })
}

/// Swap the slot's content, returning the previous id
pub fn replace(id: Option<SessionId>) -> Option<SessionId> {
    replace_entry(id.map(TraceEntry::untagged)).map(|entry| entry.id)
}

/// Swap the slot's content owner tag included, returning the previous entry
pub fn replace_entry(entry: Option<TraceEntry>) -> Option<TraceEntry> {
    TRACE_CONTEXT.with(|slot| slot.replace(entry))
}
