//! Error types for the context core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// `IdGenerator::next` was called before `IdGenerator::configure`
    #[error("Session id generator used before configure(); call configure(host_tag) at process startup")]
    NotConfigured,
}

pub type Result<T> = std::result::Result<T, ContextError>;
