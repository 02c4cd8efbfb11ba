use rewind_context_core::ContextError;
use rewind_mediation_core::MediationError;
use thiserror::Error;

/// Error type for the facade
#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Infra(#[from] rewind_infra_common::Error),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Mediation(#[from] MediationError),
}

pub type Result<T> = std::result::Result<T, AgentError>;
