//! # Rewind Context Core
//!
//! Session bookkeeping for record/replay instrumentation.
//!
//! - `id`: process-unique session ids (`<brand>-<hostTag>-<epochMillis><counter>`)
//! - `trace`: the per-thread slot holding the active session id
//! - `manager`: the session registry and lifecycle listeners
//! - `propagation`: carrying the active id across threads, pools and futures
//!
//! ```no_run
//! use rewind_context_core::{propagation, ContextManager};
//!
//! let contexts = ContextManager::global();
//! contexts.generator().configure("10.0.0.1");
//!
//! // entrance of a request
//! let _session = contexts.resolve_or_create(true, None)?.expect("fresh session");
//! let worker = propagation::spawn(|| ContextManager::global().is_recording());
//! assert!(worker.join().unwrap());
//! contexts.end();
//! # Ok::<(), rewind_context_core::ContextError>(())
//! ```

pub mod errors;
pub mod id;
pub mod listener;
pub mod manager;
pub mod propagation;
pub mod session;
pub mod trace;

pub use errors::{ContextError, Result};
pub use id::{IdGenerator, SessionId, DEFAULT_ID_BRAND};
pub use listener::ContextListener;
pub use manager::ContextManager;
pub use propagation::{CapturedContext, Executor, FutureExt, PropagatingExecutor, Task, TransmitGuard};
pub use session::{Session, SessionMode};
