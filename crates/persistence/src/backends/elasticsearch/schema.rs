//! Log index mapping.
//!
//! Every filterable field is a `keyword` (exact match) or `long`; free text
//! fields are `text`. `createTime` is a `date` so range filters and the
//! newest-first sort work on it.

use elasticsearch::indices::{IndicesCreateParts, IndicesExistsParts};
use serde_json::{Value, json};

use crate::error::StorageResult;

use super::backend::{ElasticsearchBackend, ElasticsearchConfig, internal_error};

/// Mapping shared by every log kind; kind-specific fields are mapped
/// dynamically.
pub fn create_index_mapping(config: &ElasticsearchConfig) -> Value {
    json!({
        "settings": {
            "number_of_shards": config.number_of_shards,
            "number_of_replicas": config.number_of_replicas,
            "refresh_interval": config.refresh_interval
        },
        "mappings": {
            "properties": {
                "id": { "type": "long" },
                "systemCode": { "type": "keyword" },
                "operatorId": { "type": "long" },
                "operatorName": { "type": "keyword" },
                "businessId": { "type": "long" },
                "businessType": { "type": "keyword" },
                "businessCode": { "type": "keyword" },
                "operationType": { "type": "keyword" },
                "operationTypeText": { "type": "keyword" },
                "marketId": { "type": "long" },
                "content": { "type": "text" },
                "notes": { "type": "text" },
                "createTime": { "type": "date" }
            }
        }
    })
}

/// Creates `index` with the log mapping unless it already exists.
pub async fn ensure_index(backend: &ElasticsearchBackend, index: &str) -> StorageResult<()> {
    let exists_response = backend
        .client()
        .indices()
        .exists(IndicesExistsParts::Index(&[index]))
        .send()
        .await
        .map_err(|e| internal_error(format!("Failed to check index existence: {}", e)))?;

    if exists_response.status_code().is_success() {
        return Ok(());
    }

    let response = backend
        .client()
        .indices()
        .create(IndicesCreateParts::Index(index))
        .body(create_index_mapping(backend.config()))
        .send()
        .await
        .map_err(|e| internal_error(format!("Failed to create index {}: {}", index, e)))?;

    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        // Another instance created it first
        if body.contains("resource_already_exists_exception") {
            return Ok(());
        }
        return Err(internal_error(format!(
            "Failed to create index {} (status {}): {}",
            index, status, body
        )));
    }

    tracing::info!("Created Elasticsearch index '{}'", index);
    Ok(())
}
