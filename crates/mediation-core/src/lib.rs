//! Call mediation for record/replay
//!
//! Instrumentation call sites wrap each downstream call (database query,
//! RPC, HTTP request, cache access) with [`CallMediator`]. While the calling
//! thread's session is recording, the real outcome is described by a
//! [`CallDescriptor`] and handed to a [`RecordSink`]. While it is replaying,
//! the recorded outcome is fetched through a [`ReplayLookup`] and returned
//! instead of making the call.
//!
//! ```no_run
//! use std::sync::Arc;
//! use rewind_context_core::ContextManager;
//! use rewind_mediation_core::{CallMediator, Detached, MockCategory};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mediator = CallMediator::new(ContextManager::global(), Arc::new(Detached), Arc::new(Detached));
//! let rows: Result<Vec<u32>, String> =
//!     mediator.mediate_json(MockCategory::Database, "query", "select 1", || Ok(vec![1]));
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod collaborator;
pub mod descriptor;
pub mod error;
pub mod ignore;
pub mod mediator;
pub mod payload;

pub use category::MockCategory;
pub use collaborator::{Detached, RecordSink, ReplayLookup};
pub use descriptor::{CallDescriptor, DescriptorKey};
pub use error::{MediationError, Result};
pub use ignore::IgnoreList;
pub use mediator::{Call, CallMediator, MockResult};
pub use payload::{Outcome, Payload};
