/*!
Configuration System

Agent configuration for the Rewind stack:

- Loading from TOML strings and files
- Environment variable overrides
- Self-validation after loading
*/

pub mod agent;
pub mod schema;

pub use agent::{AgentConfig, LoggingSettings};
pub use schema::SelfValidating;
