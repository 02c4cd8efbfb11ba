use super::context::CapturedContext;
use super::task::{BoxedTask, DelegateSlot, Task, TaskField};
use crate::trace::{self, TraceEntry};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{trace, warn};

/// Delegate field index per ordered task shape; `None` when the shape has none
static DELEGATE_FIELDS: Lazy<DashMap<TypeId, Option<usize>>> = Lazy::new(DashMap::new);

/// Structural wrapping failures are reported once per process
static WRAP_FAILURE_REPORTED: AtomicBool = AtomicBool::new(false);

/// A task paired with the context captured when it was submitted
pub struct ContextTask {
    inner: BoxedTask,
    context: CapturedContext,
}

impl ContextTask {
    fn new(inner: BoxedTask, entry: TraceEntry) -> Self {
        Self {
            inner,
            context: CapturedContext::from_entry(entry),
        }
    }

    pub fn context(&self) -> &CapturedContext {
        &self.context
    }
}

impl Task for ContextTask {
    fn run(self: Box<Self>) {
        let ContextTask { inner, context } = *self;
        let _guard = context.transmit();
        inner.run();
    }

    fn is_context_carrier(&self) -> bool {
        true
    }

    fn shape_name(&self) -> &'static str {
        self.inner.shape_name()
    }
}

impl std::fmt::Debug for ContextTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextTask")
            .field("inner", &self.inner.shape_name())
            .field("context", &self.context)
            .finish()
    }
}

/// Capture the calling thread's context into `task`.
///
/// Returns `task` untouched when no context is active, when it already
/// carries one, or when it manages its own propagation. Ordered tasks keep
/// their identity; their first non-ordered delegate field is wrapped
/// instead. If that field cannot be found or accessed the task runs without
/// propagation.
pub fn wrap(mut task: BoxedTask) -> BoxedTask {
    let Some(entry) = trace::entry() else {
        return task;
    };
    if skips_wrapping(&*task) {
        return task;
    }
    if task.is_ordered() {
        wrap_delegate_field(&mut *task, &entry);
        return task;
    }
    trace!(session_id = %entry.id(), task = task.shape_name(), "wrapping task");
    Box::new(ContextTask::new(task, entry))
}

/// Capture the calling thread's context into the delegate field of an
/// ordered task held by value, e.g. before pushing it into a `BinaryHeap`.
pub fn wrap_ordered<T: Task>(task: &mut T) {
    let Some(entry) = trace::entry() else {
        return;
    };
    if skips_wrapping(&*task) {
        return;
    }
    wrap_delegate_field(task, &entry);
}

fn skips_wrapping(task: &dyn Task) -> bool {
    task.is_context_carrier() || task.manages_own_context()
}

fn wrap_delegate_field(task: &mut dyn Task, entry: &TraceEntry) {
    let shape_name = task.shape_name();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let index = resolve_delegate_field(task)?;
        match task.field_mut(index)? {
            TaskField::Delegate { slot, .. } => wrap_slot(slot, entry),
            TaskField::Value => None,
        }
    }));

    if !matches!(outcome, Ok(Some(()))) {
        report_wrap_failure(shape_name);
    }
}

fn resolve_delegate_field(task: &mut dyn Task) -> Option<usize> {
    let shape = task.shape();
    if let Some(cached) = DELEGATE_FIELDS.get(&shape) {
        return *cached;
    }
    let index = (0..task.field_count()).find(|&index| {
        matches!(
            task.field_mut(index),
            Some(TaskField::Delegate { ordered: false, .. })
        )
    });
    DELEGATE_FIELDS.insert(shape, index);
    index
}

fn wrap_slot(slot: &mut DelegateSlot, entry: &TraceEntry) -> Option<()> {
    let inner = slot.take()?;
    if inner.is_context_carrier() {
        slot.put(inner);
    } else {
        trace!(session_id = %entry.id(), task = inner.shape_name(), "wrapping delegate of ordered task");
        slot.put(Box::new(ContextTask::new(inner, entry.clone())));
    }
    Some(())
}

fn report_wrap_failure(shape_name: &str) {
    if WRAP_FAILURE_REPORTED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_ok()
    {
        warn!(
            task = shape_name,
            "failed to wrap delegate of ordered task; it will run without trace context"
        );
    }
}
