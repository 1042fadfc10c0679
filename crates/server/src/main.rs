//! Business log server.
//!
//! Stores business and audit logs produced by other systems and serves
//! filtered, paginated queries over them.

use bizlog_rest::{
    LogServices, ServerConfig, StorageBackendMode, create_app_with_config, init_logging,
};
use clap::Parser;
use tracing::info;

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %backend_mode,
        max_size = config.max_size,
        scroll_keep_alive_ms = config.scroll_keep_alive_ms,
        worker_id = config.worker_id,
        "Starting business log server"
    );

    match backend_mode {
        StorageBackendMode::Memory => start_memory(config).await,
        StorageBackendMode::Elasticsearch => start_elasticsearch(config).await,
    }
}

/// Starts the server on in-memory gateways.
async fn start_memory(config: ServerConfig) -> anyhow::Result<()> {
    let services = LogServices::in_memory(&config)?;
    info!("In-memory storage initialized; logs are lost on restart");
    let app = create_app_with_config(services, config.clone());
    serve(app, &config).await
}

/// Starts the server on Elasticsearch.
#[cfg(feature = "elasticsearch")]
async fn start_elasticsearch(config: ServerConfig) -> anyhow::Result<()> {
    use std::sync::Arc;

    use bizlog_persistence::backends::elasticsearch::{
        ElasticsearchAuth, ElasticsearchBackend, ElasticsearchConfig, ElasticsearchGateway,
    };
    use bizlog_persistence::core::SnowflakeIdAllocator;
    use bizlog_persistence::types::{CustomerAccountLog, LogRecord};

    let es_nodes = config.elasticsearch_node_list();

    let es_auth = match (
        &config.elasticsearch_username,
        &config.elasticsearch_password,
    ) {
        (Some(username), Some(password)) => Some(ElasticsearchAuth::Basic {
            username: username.clone(),
            password: password.clone(),
        }),
        _ => None,
    };

    let es_config = ElasticsearchConfig {
        nodes: es_nodes.clone(),
        index_prefix: config.elasticsearch_index_prefix.clone(),
        auth: es_auth,
        ..Default::default()
    };

    info!(
        nodes = ?es_nodes,
        index_prefix = %config.elasticsearch_index_prefix,
        "Initializing Elasticsearch backend"
    );

    let backend = Arc::new(ElasticsearchBackend::new(es_config)?);
    backend.health_check().await?;

    let business = ElasticsearchGateway::<LogRecord>::new(backend.clone());
    business.initialize().await?;
    let accounts = ElasticsearchGateway::<CustomerAccountLog>::new(backend);
    accounts.initialize().await?;

    info!(
        business_index = business.index(),
        account_index = accounts.index(),
        "Elasticsearch indices ready"
    );

    let labels = bizlog_rest::load_labels(&config)?;
    let services = LogServices::new(
        Arc::new(business),
        Arc::new(accounts),
        Arc::new(labels),
        Arc::new(SnowflakeIdAllocator::new(config.worker_id)),
        config.scroll_config(),
    );

    let app = create_app_with_config(services, config.clone());
    serve(app, &config).await
}

/// Fallback when the elasticsearch feature is not enabled.
#[cfg(not(feature = "elasticsearch"))]
async fn start_elasticsearch(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The elasticsearch backend requires the 'elasticsearch' feature. \
         Build with: cargo build -p bizlog-server --features elasticsearch"
    )
}
