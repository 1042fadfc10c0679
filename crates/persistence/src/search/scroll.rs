//! Scoped scroll sessions.
//!
//! A [`ScrollSession`] owns one server-side scroll context from the moment
//! it is opened until [`ScrollSession::close`] consumes it. Closing clears
//! the context exactly once. A session that is dropped while still open (the
//! surrounding future was cancelled, or a panic unwound through it) schedules
//! the clear on the current tokio runtime instead.
//!
//! Clear failures are logged and swallowed: releasing the context is cleanup,
//! and must never replace the result of the search that used it.

use std::time::Duration;

use tracing::{debug, warn};

use crate::core::{DynGateway, ScrollHandle, ScrollRequest};
use crate::error::StorageResult;
use crate::types::LogDocument;

/// An open scroll over a result set.
pub struct ScrollSession<D: LogDocument> {
    gateway: DynGateway<D>,
    keep_alive: Duration,
    handle: Option<ScrollHandle>,
    total_elements: u64,
    total_pages: u64,
}

impl<D: LogDocument> ScrollSession<D> {
    /// Opens a scroll and returns the session with the first batch.
    pub async fn open(
        gateway: DynGateway<D>,
        keep_alive: Duration,
        request: &ScrollRequest,
    ) -> StorageResult<(Self, Vec<D>)> {
        let page = gateway.start_scroll(keep_alive, request).await?;
        debug!(
            backend = gateway.backend_name(),
            handle = %page.handle,
            total_elements = page.total_elements,
            total_pages = page.total_pages,
            "Opened scroll"
        );

        let session = Self {
            gateway,
            keep_alive,
            handle: Some(page.handle),
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        };
        Ok((session, page.items))
    }

    /// Number of matching documents, as reported when the scroll opened.
    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Number of batches at the scroll's page size.
    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Fetches the next batch. An empty batch means the traversal is done.
    pub async fn next_batch(&mut self) -> StorageResult<Vec<D>> {
        let Some(handle) = self.handle.as_ref() else {
            return Ok(Vec::new());
        };
        let page = self.gateway.continue_scroll(handle, self.keep_alive).await?;
        self.handle = Some(page.handle);
        Ok(page.items)
    }

    /// Releases the scroll context.
    pub async fn close(mut self) {
        if let Some(handle) = self.handle.take() {
            release(&self.gateway, &handle).await;
        }
    }
}

impl<D: LogDocument> Drop for ScrollSession<D> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        warn!(
            backend = self.gateway.backend_name(),
            handle = %handle,
            "Scroll session dropped without close, clearing in background"
        );
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let gateway = self.gateway.clone();
                runtime.spawn(async move {
                    release(&gateway, &handle).await;
                });
            }
            Err(_) => {
                warn!(handle = %handle, "No runtime available, scroll context left to expire");
            }
        }
    }
}

async fn release<D: LogDocument>(gateway: &DynGateway<D>, handle: &ScrollHandle) {
    match gateway.clear_scroll(handle).await {
        Ok(()) => debug!(backend = gateway.backend_name(), handle = %handle, "Cleared scroll"),
        Err(e) => warn!(
            backend = gateway.backend_name(),
            handle = %handle,
            error = %e,
            "Failed to clear scroll"
        ),
    }
}
