//! Process bootstrap

use crate::errors::Result;
use rewind_context_core::{ContextListener, ContextManager, IdGenerator};
use rewind_infra_common::{setup_logging, AgentConfig, Error as InfraError, LoggingConfig, SelfValidating};
use rewind_mediation_core::{CallMediator, IgnoreList, RecordSink, ReplayLookup};
use std::sync::Arc;
use tracing::{debug, info};

/// Handle to the configured record/replay runtime of this process.
///
/// [`Agent::init`] configures the process-wide id generator, so every
/// `Agent` shares the same [`ContextManager::global`]. Initializing again
/// (for example after a configuration reload) swaps the id prefix and keeps
/// issuing unique ids.
#[derive(Debug, Clone)]
pub struct Agent {
    config: Arc<AgentConfig>,
    contexts: Arc<ContextManager>,
    ignore: IgnoreList,
}

impl Agent {
    /// Validate `config`, install logging if enabled and configure id
    /// generation.
    pub fn init(config: AgentConfig) -> Result<Self> {
        config.validate()?;

        if config.logging.enabled {
            let logging = LoggingConfig::from_settings(&config.logging, config.service_name.as_str())?;
            match setup_logging(logging) {
                Ok(()) => {}
                // Another component or an earlier init owns the subscriber
                Err(InfraError::Initialization(reason)) => {
                    debug!(%reason, "keeping the installed tracing subscriber")
                }
                Err(err) => return Err(err.into()),
            }
        }

        IdGenerator::global().configure_with_brand(&config.id_brand, &config.host_tag);
        let ignore = IgnoreList::new(&config.ignored_operations);

        info!(
            service = %config.service_name,
            host_tag = %config.host_tag,
            ignored = config.ignored_operations.len(),
            "rewind agent initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            contexts: ContextManager::global(),
            ignore,
        })
    }

    /// Load configuration from the environment overrides on top of defaults
    pub fn from_env() -> Result<Self> {
        Self::init(AgentConfig::default().with_env_overrides())
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn contexts(&self) -> &Arc<ContextManager> {
        &self.contexts
    }

    pub fn register_listener(&self, listener: Arc<dyn ContextListener>) {
        self.contexts.register_listener(listener);
    }

    /// Mediator bound to the global context and the configured ignore list
    pub fn mediator(&self, lookup: Arc<dyn ReplayLookup>, sink: Arc<dyn RecordSink>) -> CallMediator {
        CallMediator::new(self.contexts.clone(), lookup, sink).with_ignore_list(self.ignore.clone())
    }
}
