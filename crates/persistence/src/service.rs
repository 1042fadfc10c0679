//! The log service: write and read paths for one log kind.
//!
//! Writes are prepared before they reach the gateway:
//!
//! 1. a fresh id is always allocated, whatever the producer sent;
//! 2. a missing creation time is set to the current time;
//! 3. a blank operation type label is resolved from the dictionary, or set
//!    to the empty string when the dictionary has no entry.
//!
//! Batch writes resolve the dictionary at most once per batch.
//!
//! Reads build a query from the criteria and hand it to the [`Paginator`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::core::{DynGateway, IdAllocator, LabelResolver};
use crate::error::StorageResult;
use crate::search::Paginator;
use crate::types::{FilterCriteria, LogDocument, PageRequest, PageResult, ScrollConfig};

/// Write and read operations for documents of kind `D`.
pub struct LogService<D: LogDocument> {
    gateway: DynGateway<D>,
    labels: Arc<dyn LabelResolver>,
    ids: Arc<dyn IdAllocator>,
    paginator: Paginator<D>,
}

impl<D: LogDocument> LogService<D> {
    /// Creates a service over the given collaborators.
    pub fn new(
        gateway: DynGateway<D>,
        labels: Arc<dyn LabelResolver>,
        ids: Arc<dyn IdAllocator>,
        scroll: ScrollConfig,
    ) -> Self {
        let paginator = Paginator::new(gateway.clone(), scroll);
        Self {
            gateway,
            labels,
            ids,
            paginator,
        }
    }

    /// Name of the underlying gateway.
    pub fn backend_name(&self) -> &'static str {
        self.gateway.backend_name()
    }

    /// Pagination limits in effect.
    pub fn scroll_config(&self) -> ScrollConfig {
        self.paginator.config()
    }

    /// Prepares and stores one document, returning it as stored.
    #[instrument(skip_all, fields(kind = D::INDEX_SUFFIX))]
    pub async fn save(&self, document: D) -> StorageResult<D> {
        let document = self.prepare(document).await?;
        self.gateway.save(&document).await?;
        debug!(id = ?document.header().id, "Saved log");
        Ok(document)
    }

    /// Prepares and stores a batch of documents in one gateway call.
    ///
    /// An empty batch performs no calls at all.
    #[instrument(skip_all, fields(kind = D::INDEX_SUFFIX, count = documents.len()))]
    pub async fn batch_save(&self, documents: Vec<D>) -> StorageResult<Vec<D>> {
        if documents.is_empty() {
            return Ok(documents);
        }

        let labels = if documents.iter().any(|d| d.header().needs_operation_type_text()) {
            self.labels.resolve_all_labels().await?
        } else {
            HashMap::new()
        };

        let documents = documents
            .into_iter()
            .map(|document| self.prepare_with(document, |code| labels.get(code).cloned()))
            .collect::<StorageResult<Vec<D>>>()?;

        self.gateway.save_all(&documents).await?;
        debug!("Saved log batch");
        Ok(documents)
    }

    /// Returns one page of matching documents, newest first.
    pub async fn search_page(
        &self,
        criteria: Option<&FilterCriteria>,
        request: &PageRequest,
    ) -> StorageResult<PageResult<D>> {
        self.paginator.search(criteria, request).await
    }

    /// Returns the matching documents of `request` without paging metadata,
    /// newest first. [`PageRequest::all`] returns every match.
    pub async fn list(
        &self,
        criteria: Option<&FilterCriteria>,
        request: &PageRequest,
    ) -> StorageResult<Vec<D>> {
        let page = self.paginator.search(criteria, request).await?;
        Ok(page.items)
    }

    /// Removes every document of this kind.
    #[instrument(skip_all, fields(kind = D::INDEX_SUFFIX))]
    pub async fn delete_all(&self) -> StorageResult<()> {
        self.gateway.delete_all().await?;
        debug!("Deleted all logs");
        Ok(())
    }

    /// Applies the write-path rules to a single document.
    pub async fn prepare(&self, document: D) -> StorageResult<D> {
        let label = if document.header().needs_operation_type_text() {
            match document.header().operation_type.as_deref() {
                Some(code) => self.labels.resolve_label(code).await?,
                None => None,
            }
        } else {
            None
        };
        self.prepare_with(document, |_| label.clone())
    }

    fn prepare_with(
        &self,
        mut document: D,
        label_for: impl Fn(&str) -> Option<String>,
    ) -> StorageResult<D> {
        let id = self.ids.next_id()?;
        let header = document.header_mut();
        header.id = Some(id);
        if header.create_time.is_none() {
            header.create_time = Some(Utc::now());
        }
        if header.needs_operation_type_text() {
            let label = header.operation_type.as_deref().and_then(&label_for);
            header.operation_type_text = Some(label.unwrap_or_default());
        }
        Ok(document)
    }
}
