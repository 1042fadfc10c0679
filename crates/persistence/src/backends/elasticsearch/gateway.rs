//! [`PersistenceGateway`] over Elasticsearch.
//!
//! Each log kind lives in its own index, `{prefix}-{suffix}`. Documents are
//! indexed under their numeric id. Searches use the scroll API: the first
//! request opens the context with `?scroll=<keep-alive>`, continuations post
//! the scroll id to `_search/scroll`, and the context is released with
//! `DELETE _search/scroll`.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::http::request::JsonBody;
use elasticsearch::http::response::Response;
use elasticsearch::{
    BulkParts, ClearScrollParts, DeleteByQueryParts, IndexParts, ScrollParts, SearchParts,
};
use serde_json::{Value, json};
use tracing::debug;

use crate::core::{PersistenceGateway, ScrollHandle, ScrollPage, ScrollRequest};
use crate::error::{BackendError, StorageResult, ValidationError};
use crate::types::{LogDocument, page_count};

use super::backend::{BACKEND_NAME, ElasticsearchBackend, internal_error};
use super::schema;

/// Elasticsearch gateway for documents of kind `D`.
pub struct ElasticsearchGateway<D: LogDocument> {
    backend: Arc<ElasticsearchBackend>,
    index: String,
    _kind: PhantomData<fn() -> D>,
}

impl<D: LogDocument> ElasticsearchGateway<D> {
    /// Creates a gateway over the index for `D`.
    pub fn new(backend: Arc<ElasticsearchBackend>) -> Self {
        let index = backend.index_name(D::INDEX_SUFFIX);
        Self {
            backend,
            index,
            _kind: PhantomData,
        }
    }

    /// Name of the index this gateway reads and writes.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Creates the index if it does not exist yet.
    pub async fn initialize(&self) -> StorageResult<()> {
        schema::ensure_index(&self.backend, &self.index).await
    }

    fn document_id(document: &D) -> StorageResult<String> {
        document
            .header()
            .id
            .map(|id| id.to_string())
            .ok_or_else(|| ValidationError::MissingRecordId.into())
    }

    fn scroll_page(&self, body: &Value, page_size: u32) -> StorageResult<ScrollPage<D>> {
        let (handle, hits, total_elements) = parse_scroll_response(body)?;
        let items = hits
            .into_iter()
            .map(|source| serde_json::from_value(source).map_err(Into::into))
            .collect::<StorageResult<Vec<D>>>()?;
        Ok(ScrollPage {
            handle,
            items,
            total_elements,
            total_pages: page_count(total_elements, page_size),
        })
    }
}

/// Builds the body of the request that opens a scroll.
pub fn build_scroll_body(request: &ScrollRequest) -> Value {
    json!({
        "query": request.query.to_json(),
        "sort": request.sort.iter().map(|s| s.to_json()).collect::<Vec<_>>(),
        "size": request.page_size,
        "track_total_hits": true
    })
}

/// Extracts the scroll id, the `_source` of each hit and the total hit count.
pub fn parse_scroll_response(body: &Value) -> StorageResult<(ScrollHandle, Vec<Value>, u64)> {
    let handle = body
        .get("_scroll_id")
        .and_then(Value::as_str)
        .map(ScrollHandle::new)
        .ok_or_else(|| internal_error("scroll response has no _scroll_id"))?;

    // `hits.total` is an object since 7.0, a bare number before
    let total = &body["hits"]["total"];
    let total_elements = total
        .get("value")
        .and_then(Value::as_u64)
        .or_else(|| total.as_u64())
        .unwrap_or(0);

    let hits = body["hits"]["hits"]
        .as_array()
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit.get("_source").cloned())
                .collect()
        })
        .unwrap_or_default();

    Ok((handle, hits, total_elements))
}

fn keep_alive_param(keep_alive: Duration) -> String {
    format!("{}ms", keep_alive.as_millis())
}

async fn read_body(response: Response, action: &str) -> StorageResult<Value> {
    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(internal_error(format!(
            "{} failed (status {}): {}",
            action, status, body
        )));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| internal_error(format!("Failed to parse {} response: {}", action, e)))
}

#[async_trait]
impl<D: LogDocument> PersistenceGateway<D> for ElasticsearchGateway<D> {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn save(&self, document: &D) -> StorageResult<()> {
        let id = Self::document_id(document)?;
        let body = serde_json::to_value(document)?;

        let response = self
            .backend
            .client()
            .index(IndexParts::IndexId(&self.index, &id))
            .body(body)
            .send()
            .await
            .map_err(|e| internal_error(format!("Failed to index document {}: {}", id, e)))?;
        read_body(response, "index").await?;
        Ok(())
    }

    async fn save_all(&self, documents: &[D]) -> StorageResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for document in documents {
            let id = Self::document_id(document)?;
            body.push(json!({ "index": { "_id": id } }).into());
            body.push(serde_json::to_value(document)?.into());
        }

        let response = self
            .backend
            .client()
            .bulk(BulkParts::Index(&self.index))
            .body(body)
            .send()
            .await
            .map_err(|e| internal_error(format!("Bulk request failed: {}", e)))?;
        let result = read_body(response, "bulk").await?;

        if result.get("errors").and_then(Value::as_bool).unwrap_or(false) {
            let failed = result["items"]
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter(|item| item["index"].get("error").is_some())
                        .count()
                })
                .unwrap_or(0);
            return Err(internal_error(format!(
                "Bulk indexing failed for {} of {} documents",
                failed,
                documents.len()
            )));
        }
        Ok(())
    }

    async fn delete_all(&self) -> StorageResult<()> {
        let response = self
            .backend
            .client()
            .delete_by_query(DeleteByQueryParts::Index(&[&self.index]))
            .body(json!({ "query": { "match_all": {} } }))
            .send()
            .await
            .map_err(|e| internal_error(format!("Delete by query failed: {}", e)))?;
        let result = read_body(response, "delete_by_query").await?;
        debug!(index = %self.index, deleted = ?result.get("deleted"), "Deleted all documents");
        Ok(())
    }

    async fn start_scroll(
        &self,
        keep_alive: Duration,
        request: &ScrollRequest,
    ) -> StorageResult<ScrollPage<D>> {
        let keep_alive = keep_alive_param(keep_alive);
        let response = self
            .backend
            .client()
            .search(SearchParts::Index(&[&self.index]))
            .scroll(&keep_alive)
            .body(build_scroll_body(request))
            .send()
            .await
            .map_err(|e| BackendError::QueryError {
                message: format!("Search on {} failed: {}", self.index, e),
            })?;
        let body = read_body(response, "search").await?;
        self.scroll_page(&body, request.page_size)
    }

    async fn continue_scroll(
        &self,
        handle: &ScrollHandle,
        keep_alive: Duration,
    ) -> StorageResult<ScrollPage<D>> {
        let response = self
            .backend
            .client()
            .scroll(ScrollParts::None)
            .body(json!({
                "scroll": keep_alive_param(keep_alive),
                "scroll_id": handle.as_str()
            }))
            .send()
            .await
            .map_err(|e| BackendError::QueryError {
                message: format!("Scroll on {} failed: {}", self.index, e),
            })?;

        if response.status_code().as_u16() == 404 {
            return Err(BackendError::ScrollExpired {
                backend_name: BACKEND_NAME.to_string(),
                handle: handle.to_string(),
            }
            .into());
        }
        let body = read_body(response, "scroll").await?;
        // Continuations do not echo the batch size, so no page count
        self.scroll_page(&body, 0)
    }

    async fn clear_scroll(&self, handle: &ScrollHandle) -> StorageResult<()> {
        let response = self
            .backend
            .client()
            .clear_scroll(ClearScrollParts::None)
            .body(json!({ "scroll_id": [handle.as_str()] }))
            .send()
            .await
            .map_err(|e| internal_error(format!("Clear scroll failed: {}", e)))?;

        // 404 means the context already expired
        if response.status_code().as_u16() == 404 {
            return Ok(());
        }
        read_body(response, "clear_scroll").await?;
        Ok(())
    }
}
