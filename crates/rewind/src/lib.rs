//! # Rewind
//!
//! Record/replay session context for multi-threaded services. An entrance
//! point opens a session, the session id follows the work across thread
//! pools, ad-hoc threads and async tasks, and downstream calls are recorded
//! or replayed according to the session's mode.
//!
//! ```no_run
//! use rewind::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let agent = Agent::init(AgentConfig::new("orders", "10.0.0.1"))?;
//! let mediator = agent.mediator(Arc::new(Detached), Arc::new(Detached));
//!
//! // Entrance point
//! agent.contexts().resolve_or_create(true, None)?;
//! let rows: Result<Vec<u32>, String> =
//!     mediator.mediate_json(MockCategory::Database, "query", "select 1", || Ok(vec![1]));
//! agent.contexts().end();
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod errors;

pub use agent::Agent;
pub use errors::{AgentError, Result};

pub use rewind_context_core as context;
pub use rewind_infra_common as infra;
pub use rewind_mediation_core as mediation;

pub mod prelude {
    pub use crate::{Agent, AgentError};
    pub use rewind_context_core::propagation::{self, task_fn, Executor, PropagatingExecutor, Task};
    pub use rewind_context_core::{
        trace, CapturedContext, ContextListener, ContextManager, FutureExt, IdGenerator, Session,
        SessionId, SessionMode,
    };
    pub use rewind_infra_common::AgentConfig;
    pub use rewind_mediation_core::{
        Call, CallDescriptor, CallMediator, Detached, MockCategory, MockResult, Outcome, Payload,
        RecordSink, ReplayLookup,
    };
}
