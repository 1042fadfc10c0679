//! # bizlog-rest - Business Log RPC Surface
//!
//! JSON-over-HTTP endpoints for producing and querying business logs. Every
//! log kind gets the same five RPCs under its own path prefix.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bizlog_rest::{LogServices, ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let services = LogServices::in_memory(&config)?;
//!     let app = create_app_with_config(services, config);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | RPC | HTTP Method | URL Pattern |
//! |-----|-------------|-------------|
//! | save | POST | `/api/{kind}/save` |
//! | batchSave | POST | `/api/{kind}/batchSave` |
//! | listPage | POST | `/api/{kind}/listPage` |
//! | list | POST | `/api/{kind}/list` |
//! | deleteAll | POST | `/api/{kind}/deleteAll` |
//! | health | GET | `/health` |
//!
//! `{kind}` is `businessLog` or `customerAccountLog`.
//!
//! ## Error Handling
//!
//! Every response is a JSON envelope with `code`, `message`, `success` and
//! `data`. Failures carry code `"5000"`; rejected requests are answered with
//! HTTP 200 and backend failures with HTTP 500.
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - Error type and its envelope rendering
//! - [`state`] - Log services and per-kind application state
//! - [`extractors`] - Request body and header extractors
//! - [`handlers`] - HTTP request handlers
//! - [`responses`] - Response envelopes
//! - [`routing`] - Route configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod responses;
pub mod routing;
pub mod state;

pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use responses::{BaseOutput, PageOutput};
pub use state::{AppState, HealthState, LogServices, load_labels};

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the application with the default configuration.
pub fn create_app(services: LogServices) -> Router {
    create_app_with_config(services, ServerConfig::default())
}

/// Creates the application router.
///
/// Adds request tracing and a request timeout to every route, and CORS
/// when enabled.
pub fn create_app_with_config(services: LogServices, config: ServerConfig) -> Router {
    info!(
        backend = services.backend_name(),
        max_size = config.max_size,
        "Creating business log RPC server"
    );

    let health = HealthState {
        backend_name: services.backend_name(),
    };
    let config = Arc::new(config);
    let router = routing::create_routes(
        AppState::new(services.business, config.clone()),
        AppState::new(services.accounts, config.clone()),
        health,
    );

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bizlog={level},bizlog_rest={level},bizlog_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
