/*!
Logging

Subscriber setup for processes embedding the Rewind agent. Library code only
emits `tracing` events; installing a subscriber is left to the host process
or to `Agent::init` when logging is enabled in the configuration.
*/

pub mod setup;

pub use setup::{parse_log_level, setup_logging, LoggingConfig};
