//! Cross-thread propagation of the trace context.
//!
//! Pooled worker threads run unrelated work back to back, so the submitting
//! thread's session id has to travel with the task and the worker's own
//! residual id has to come back once the task is done:
//!
//! 1. **capture** the submitting thread's id when a task is wrapped
//!    (nothing is wrapped when no id is active),
//! 2. **transmit** it into the worker's slot right before the task runs,
//! 3. **restore** the worker's previous id when the task returns or unwinds.
//!
//! Steps 2 and 3 are a [`TransmitGuard`]. Tasks that cannot be replaced by a
//! wrapper because their container orders them (priority queues) get their
//! inner delegate wrapped instead, see [`wrap`].

mod context;
mod executor;
mod future;
mod task;
mod thread;
mod wrapper;

pub use context::{CapturedContext, TransmitGuard};
pub use executor::{Executor, PropagatingExecutor, RejectedTask};
pub use future::{FutureExt, Propagated};
#[cfg(feature = "tokio")]
pub use future::spawn_async;
pub use task::{task_fn, BoxedTask, DelegateSlot, FnTask, Task, TaskField};
pub use thread::{propagate, spawn, spawn_named};
pub use wrapper::{wrap, wrap_ordered, ContextTask};
