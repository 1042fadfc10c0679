//! Business Log Persistence Layer
//!
//! This crate stores business and audit log records in a search engine and
//! reads them back through filtered, paginated queries. The search engine
//! caps the number of documents a single request may return; the read path
//! hides that cap by walking a scroll (cursor) over the result set.
//!
//! # Features
//!
//! - **Query building**: optional filters become a conjunctive boolean query
//! - **Scroll pagination**: pages larger than the engine cap, or the whole
//!   result set, assembled from several fetches; every scroll is cleared
//! - **Write path**: server-assigned ids, default creation time, operation
//!   type labels filled in from a dictionary
//! - **Log kinds**: one service per document kind, each in its own index
//!
//! # Backend Features
//!
//! - in-memory gateway (always available) - development and tests
//! - `elasticsearch` - Elasticsearch through the scroll API
//!
//! # Architecture
//!
//! - [`types`] - log documents, filter criteria, paging types
//! - [`error`] - error types for all operations
//! - [`core`] - gateway, label resolver and id allocator traits
//! - [`search`] - query builder, scroll sessions, paginator
//! - [`service`] - the write and read paths per log kind
//! - [`backends`] - gateway implementations
//!
//! # Quick Start
//!
//! ```
//! use bizlog_persistence::search::{FetchPlan, Query, build_query};
//! use bizlog_persistence::types::{FilterCriteria, PageRequest};
//!
//! let criteria = FilterCriteria::new()
//!     .with_system_code("CRM")
//!     .with_market_ids([1, 2]);
//! let query = build_query(Some(&criteria));
//! assert!(matches!(query, Query::Bool { .. }));
//! assert_eq!(build_query(None), Query::MatchAll);
//!
//! // 25 000 rows with no explicit page: three fetches of 10 000
//! let plan = FetchPlan::resolve(&PageRequest::first(25_000), 10_000).unwrap();
//! assert_eq!(
//!     plan,
//!     FetchPlan::Bounded { fetch_count: 3, page_size: 10_000, limit: 25_000 }
//! );
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod search;
pub mod service;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use service::LogService;
pub use types::{CustomerAccountLog, FilterCriteria, LogQuery, LogRecord, PageRequest, PageResult};

// Re-export core traits
pub use core::{IdAllocator, LabelResolver, PersistenceGateway};
