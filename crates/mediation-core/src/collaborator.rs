//! Seams to the external record and replay stores

use crate::descriptor::CallDescriptor;
use crate::payload::Outcome;

/// Finds the recorded outcome of a call while replaying
pub trait ReplayLookup: Send + Sync {
    /// `Ok(None)` when nothing was recorded for the descriptor's key
    fn lookup(&self, descriptor: &CallDescriptor) -> anyhow::Result<Option<Outcome>>;
}

/// Stores the outcome of a call while recording
pub trait RecordSink: Send + Sync {
    fn record(&self, descriptor: CallDescriptor) -> anyhow::Result<()>;
}

/// Lookup and sink that do nothing, for processes that only propagate context
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl ReplayLookup for Detached {
    fn lookup(&self, _descriptor: &CallDescriptor) -> anyhow::Result<Option<Outcome>> {
        Ok(None)
    }
}

impl RecordSink for Detached {
    fn record(&self, _descriptor: CallDescriptor) -> anyhow::Result<()> {
        Ok(())
    }
}
