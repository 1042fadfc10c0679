//! Server configuration for the business log RPC surface.
//!
//! Every option can be given on the command line or through a `BIZLOG_*`
//! environment variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BIZLOG_SERVER_PORT` | 8080 | Server port |
//! | `BIZLOG_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `BIZLOG_LOG_LEVEL` | info | Log level |
//! | `BIZLOG_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `BIZLOG_ENABLE_CORS` | true | Enable CORS |
//! | `BIZLOG_CORS_ORIGINS` | * | Allowed origins |
//! | `BIZLOG_CORS_METHODS` | GET,POST,OPTIONS | Allowed methods |
//! | `BIZLOG_CORS_HEADERS` | Content-Type,Authorization,Accept,Referer | Allowed headers |
//! | `BIZLOG_STORAGE_BACKEND` | memory | `memory` or `elasticsearch` |
//! | `BIZLOG_ES_NODES` | http://localhost:9200 | Comma-separated node URLs |
//! | `BIZLOG_ES_INDEX_PREFIX` | bizlog | Index name prefix |
//! | `BIZLOG_ES_USERNAME` | | Basic auth user |
//! | `BIZLOG_ES_PASSWORD` | | Basic auth password |
//! | `BIZLOG_MAX_SIZE` | 10000 | Engine cap on documents per fetch |
//! | `BIZLOG_SCROLL_KEEP_ALIVE_MS` | 5000 | Scroll keep-alive (milliseconds) |
//! | `BIZLOG_WORKER_ID` | 1 | Id allocator worker id (0-1023) |
//! | `BIZLOG_LABELS_FILE` | | JSON file of operation type labels |
//!
//! # Example
//!
//! ```rust
//! use bizlog_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     max_size: 500,
//!     ..Default::default()
//! };
//! assert_eq!(config.scroll_config().max_size, 500);
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use bizlog_persistence::types::{DEFAULT_MAX_SIZE, ScrollConfig};
use clap::Parser;

/// Largest worker id the id allocator can encode.
pub const MAX_WORKER_ID: u16 = 1023;

/// Which persistence gateway the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendMode {
    /// Process-local store, lost on restart.
    Memory,
    /// Elasticsearch through the scroll API.
    Elasticsearch,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Memory => write!(f, "memory"),
            StorageBackendMode::Elasticsearch => write!(f, "elasticsearch"),
        }
    }
}

impl FromStr for StorageBackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackendMode::Memory),
            "elasticsearch" | "es" => Ok(StorageBackendMode::Elasticsearch),
            other => Err(format!(
                "unknown storage backend '{}', expected 'memory' or 'elasticsearch'",
                other
            )),
        }
    }
}

/// Server configuration.
///
/// Built from the command line and environment with [`ServerConfig::parse`],
/// or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "bizlog")]
#[command(about = "Business log service")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "BIZLOG_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "BIZLOG_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "BIZLOG_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "BIZLOG_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "BIZLOG_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "BIZLOG_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "BIZLOG_CORS_METHODS", default_value = "GET,POST,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "BIZLOG_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept,Referer"
    )]
    pub cors_headers: String,

    /// Storage backend: `memory` or `elasticsearch`.
    #[arg(long, env = "BIZLOG_STORAGE_BACKEND", default_value = "memory")]
    pub storage_backend: String,

    /// Elasticsearch node URLs (comma-separated).
    #[arg(long, env = "BIZLOG_ES_NODES", default_value = "http://localhost:9200")]
    pub elasticsearch_nodes: String,

    /// Prefix of the Elasticsearch index names.
    #[arg(long, env = "BIZLOG_ES_INDEX_PREFIX", default_value = "bizlog")]
    pub elasticsearch_index_prefix: String,

    /// Elasticsearch basic auth user.
    #[arg(long, env = "BIZLOG_ES_USERNAME")]
    pub elasticsearch_username: Option<String>,

    /// Elasticsearch basic auth password.
    #[arg(long, env = "BIZLOG_ES_PASSWORD")]
    pub elasticsearch_password: Option<String>,

    /// Maximum number of documents the engine returns per fetch.
    #[arg(long, env = "BIZLOG_MAX_SIZE", default_value = "10000")]
    pub max_size: u32,

    /// Scroll keep-alive between two fetches, in milliseconds.
    #[arg(long, env = "BIZLOG_SCROLL_KEEP_ALIVE_MS", default_value = "5000")]
    pub scroll_keep_alive_ms: u64,

    /// Worker id embedded in allocated log ids.
    #[arg(long, env = "BIZLOG_WORKER_ID", default_value = "1")]
    pub worker_id: u16,

    /// JSON file mapping operation type codes to labels.
    #[arg(long, env = "BIZLOG_LABELS_FILE")]
    pub labels_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept,Referer".to_string(),
            storage_backend: "memory".to_string(),
            elasticsearch_nodes: "http://localhost:9200".to_string(),
            elasticsearch_index_prefix: "bizlog".to_string(),
            elasticsearch_username: None,
            elasticsearch_password: None,
            max_size: DEFAULT_MAX_SIZE,
            scroll_keep_alive_ms: 5_000,
            worker_id: 1,
            labels_file: None,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration from environment variables only.
    pub fn from_env() -> Self {
        Self::try_parse_from(["bizlog"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured storage backend.
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, String> {
        self.storage_backend.parse()
    }

    /// Returns the configured Elasticsearch nodes, blanks removed.
    pub fn elasticsearch_node_list(&self) -> Vec<String> {
        self.elasticsearch_nodes
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Pagination limits handed to every log service.
    pub fn scroll_config(&self) -> ScrollConfig {
        ScrollConfig::new(
            self.max_size,
            Duration::from_millis(self.scroll_keep_alive_ms),
        )
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.max_size == 0 {
            errors.push("Max size cannot be 0".to_string());
        }

        if self.scroll_keep_alive_ms == 0 {
            errors.push("Scroll keep-alive cannot be 0".to_string());
        }

        if self.worker_id > MAX_WORKER_ID {
            errors.push(format!("Worker id cannot exceed {}", MAX_WORKER_ID));
        }

        match self.storage_backend_mode() {
            Ok(StorageBackendMode::Elasticsearch) => {
                if self.elasticsearch_node_list().is_empty() {
                    errors.push("At least one Elasticsearch node is required".to_string());
                }
                if self.elasticsearch_username.is_some() != self.elasticsearch_password.is_some()
                {
                    errors.push(
                        "Elasticsearch username and password must be given together".to_string(),
                    );
                }
            }
            Ok(StorageBackendMode::Memory) => {}
            Err(e) => errors.push(e),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            max_size: 100,
            ..Self::default()
        }
    }
}
