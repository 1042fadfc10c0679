//! Elasticsearch backend.
//!
//! [`ElasticsearchBackend`] owns the client and configuration;
//! [`ElasticsearchGateway`] implements the gateway for one log kind on top
//! of it, so every kind shares one connection pool.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bizlog_persistence::backends::elasticsearch::{
//!     ElasticsearchBackend, ElasticsearchConfig, ElasticsearchGateway,
//! };
//! use bizlog_persistence::types::LogRecord;
//!
//! let backend = Arc::new(ElasticsearchBackend::new(ElasticsearchConfig::default())?);
//! let gateway = ElasticsearchGateway::<LogRecord>::new(backend);
//! gateway.initialize().await?;
//! ```

mod backend;
mod gateway;
mod schema;

pub use backend::{ElasticsearchAuth, ElasticsearchBackend, ElasticsearchConfig};
pub use gateway::{ElasticsearchGateway, build_scroll_body, parse_scroll_response};
pub use schema::create_index_mapping;
