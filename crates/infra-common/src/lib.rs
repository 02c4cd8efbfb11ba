//! # Rewind Infra Common
//!
//! Shared infrastructure for the Rewind crates:
//!
//! - `errors`: the common error type and result alias
//! - `logging`: `tracing` subscriber setup driven by configuration
//! - `config`: agent configuration loaded from TOML and the environment

pub mod config;
pub mod errors;
pub mod logging;

pub use config::{AgentConfig, LoggingSettings, SelfValidating};
pub use errors::{Error, Result};
pub use logging::{setup_logging, LoggingConfig};
