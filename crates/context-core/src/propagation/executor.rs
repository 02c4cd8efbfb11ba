use super::task::BoxedTask;
use super::wrapper::wrap;
use std::fmt;

/// A task an executor refused to accept. It was never run.
pub struct RejectedTask {
    pub task: BoxedTask,
    pub reason: String,
}

impl RejectedTask {
    pub fn new(task: BoxedTask, reason: impl Into<String>) -> Self {
        Self {
            task,
            reason: reason.into(),
        }
    }
}

impl fmt::Debug for RejectedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RejectedTask")
            .field("task", &self.task.shape_name())
            .field("reason", &self.reason)
            .finish()
    }
}

impl fmt::Display for RejectedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task {} rejected: {}", self.task.shape_name(), self.reason)
    }
}

/// Something that runs tasks, usually on other threads
pub trait Executor: Send + Sync {
    fn execute(&self, task: BoxedTask) -> Result<(), RejectedTask>;
}

/// Executor decorator wrapping every submitted task with the submitter's
/// trace context
#[derive(Debug, Clone)]
pub struct PropagatingExecutor<E> {
    inner: E,
}

impl<E: Executor> PropagatingExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }
}

impl<E: Executor> Executor for PropagatingExecutor<E> {
    fn execute(&self, task: BoxedTask) -> Result<(), RejectedTask> {
        self.inner.execute(wrap(task))
    }
}
