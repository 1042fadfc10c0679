//! Persistence gateway trait.
//!
//! The gateway is the narrow view of the search engine the service needs:
//! indexing documents and walking result sets through a scroll (cursor)
//! protocol. A scroll is opened with [`PersistenceGateway::start_scroll`],
//! advanced with [`PersistenceGateway::continue_scroll`] and must be released
//! with [`PersistenceGateway::clear_scroll`]. Callers should not drive these
//! by hand; [`ScrollSession`](crate::search::ScrollSession) owns the handle
//! and guarantees the release.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::search::{Query, Sort};
use crate::types::LogDocument;

/// Opaque identifier of a server-side scroll context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScrollHandle(String);

impl ScrollHandle {
    /// Wraps an engine-issued scroll id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw scroll id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScrollHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The search that opens a scroll.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollRequest {
    /// Documents to match.
    pub query: Query,
    /// Ordering of the traversal.
    pub sort: Vec<Sort>,
    /// Documents per batch.
    pub page_size: u32,
}

impl ScrollRequest {
    /// Creates a request sorted newest first.
    pub fn new(query: Query, page_size: u32) -> Self {
        Self {
            query,
            sort: vec![Sort::create_time_desc()],
            page_size,
        }
    }
}

/// One batch of a scroll traversal.
#[derive(Debug, Clone)]
pub struct ScrollPage<D> {
    /// Handle to continue from. Engines may rotate it on every call.
    pub handle: ScrollHandle,
    /// The batch, in sort order.
    pub items: Vec<D>,
    /// Number of matching documents.
    pub total_elements: u64,
    /// Number of batches at the scroll's page size. Only required on the
    /// page that opens the scroll; continuations may report zero.
    pub total_pages: u64,
}

/// Search engine primitives used by the log service.
#[async_trait]
pub trait PersistenceGateway<D: LogDocument>: Send + Sync {
    /// Returns a short name for logs and errors.
    fn backend_name(&self) -> &'static str;

    /// Indexes one document. The document must carry an id.
    async fn save(&self, document: &D) -> StorageResult<()>;

    /// Indexes several documents in one request.
    ///
    /// Not transactional: on failure some documents may have been indexed.
    async fn save_all(&self, documents: &[D]) -> StorageResult<()>;

    /// Removes every document of this kind.
    async fn delete_all(&self) -> StorageResult<()>;

    /// Runs the search and opens a scroll over its results.
    async fn start_scroll(
        &self,
        keep_alive: Duration,
        request: &ScrollRequest,
    ) -> StorageResult<ScrollPage<D>>;

    /// Fetches the next batch. Fails once the keep-alive has elapsed.
    async fn continue_scroll(
        &self,
        handle: &ScrollHandle,
        keep_alive: Duration,
    ) -> StorageResult<ScrollPage<D>>;

    /// Releases the scroll context.
    async fn clear_scroll(&self, handle: &ScrollHandle) -> StorageResult<()>;
}

/// Shared, type-erased gateway.
pub type DynGateway<D> = Arc<dyn PersistenceGateway<D>>;
