//! Application state.
//!
//! [`LogServices`] wires one [`LogService`] per log kind; each kind's routes
//! then share an [`AppState`] over its service.

use std::sync::Arc;

use bizlog_persistence::LogService;
use bizlog_persistence::backends::MemoryGateway;
use bizlog_persistence::core::{
    DictionaryLabelResolver, DynGateway, IdAllocator, LabelResolver, SnowflakeIdAllocator,
};
use bizlog_persistence::error::StorageResult;
use bizlog_persistence::types::{CustomerAccountLog, LogDocument, LogRecord, ScrollConfig};
use tracing::info;

use crate::config::ServerConfig;

/// Shared state for the routes of log kind `D`.
pub struct AppState<D: LogDocument> {
    /// The log service.
    service: Arc<LogService<D>>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manual impl: cloning only bumps the Arcs
impl<D: LogDocument> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            config: Arc::clone(&self.config),
        }
    }
}

impl<D: LogDocument> AppState<D> {
    /// Creates a new state over a service and configuration.
    pub fn new(service: Arc<LogService<D>>, config: Arc<ServerConfig>) -> Self {
        Self { service, config }
    }

    /// Returns the log service.
    pub fn service(&self) -> &LogService<D> {
        &self.service
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// State for the service-wide routes.
#[derive(Debug, Clone)]
pub struct HealthState {
    /// Name of the gateway the log kinds run on.
    pub backend_name: &'static str,
}

/// One service per log kind, sharing the label dictionary and id allocator.
pub struct LogServices {
    /// Business logs.
    pub business: Arc<LogService<LogRecord>>,

    /// Customer account logs.
    pub accounts: Arc<LogService<CustomerAccountLog>>,
}

impl LogServices {
    /// Wires both services over their gateways.
    pub fn new(
        business: DynGateway<LogRecord>,
        accounts: DynGateway<CustomerAccountLog>,
        labels: Arc<dyn LabelResolver>,
        ids: Arc<dyn IdAllocator>,
        scroll: ScrollConfig,
    ) -> Self {
        Self {
            business: Arc::new(LogService::new(
                business,
                labels.clone(),
                ids.clone(),
                scroll,
            )),
            accounts: Arc::new(LogService::new(accounts, labels, ids, scroll)),
        }
    }

    /// Wires both services over in-memory gateways, taking labels, worker id
    /// and scroll limits from the configuration.
    pub fn in_memory(config: &ServerConfig) -> StorageResult<Self> {
        let labels = load_labels(config)?;
        Ok(Self::new(
            Arc::new(MemoryGateway::new()),
            Arc::new(MemoryGateway::new()),
            Arc::new(labels),
            Arc::new(SnowflakeIdAllocator::new(config.worker_id)),
            config.scroll_config(),
        ))
    }

    /// Name of the gateway the business log service runs on.
    pub fn backend_name(&self) -> &'static str {
        self.business.backend_name()
    }
}

/// Loads the operation type dictionary named by the configuration, or an
/// empty one when no file is configured.
pub fn load_labels(config: &ServerConfig) -> StorageResult<DictionaryLabelResolver> {
    match &config.labels_file {
        Some(path) => {
            let labels = DictionaryLabelResolver::from_json_file(path)?;
            info!(path = %path.display(), count = labels.len(), "Loaded operation type labels");
            Ok(labels)
        }
        None => Ok(DictionaryLabelResolver::empty()),
    }
}
