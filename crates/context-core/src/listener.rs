//! Session lifecycle listeners

use crate::session::Session;
use std::sync::Arc;

/// Receives session lifecycle events.
///
/// Callbacks run synchronously on the thread that created or ended the
/// session, in registration order. A panicking listener is logged and
/// skipped; it does not stop the remaining listeners or registry cleanup.
pub trait ContextListener: Send + Sync {
    /// A session was created at an entrance point
    fn on_create(&self, session: &Arc<Session>);

    /// A session ended. `None` when the ending thread held an id that was
    /// never registered.
    fn on_complete(&self, session: Option<&Arc<Session>>);

    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
