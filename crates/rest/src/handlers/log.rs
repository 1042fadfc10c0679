//! Log RPC handlers.
//!
//! The same five handlers serve every log kind; the router instantiates
//! them once per [`LogDocument`] type.
//!
//! | RPC | Body | Data |
//! |-----|------|------|
//! | `save` | one record | assigned id |
//! | `batchSave` | array of records | assigned ids, in order |
//! | `listPage` | query with `page` / `rows` | page of records ([`PageOutput`]) |
//! | `list` | query with optional `page` / `rows` | matching records |
//! | `deleteAll` | none | none |

use axum::{Json, extract::State};
use bizlog_persistence::LogQuery;
use bizlog_persistence::types::LogDocument;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{Referer, RpcBody};
use crate::responses::{BaseOutput, PageOutput};
use crate::state::AppState;

/// Handler for `POST /api/{kind}/save`.
///
/// Stores one record. The server assigns the id and fills in the creation
/// time and operation type label when missing.
pub async fn save_handler<D: LogDocument>(
    State(state): State<AppState<D>>,
    referer: Referer,
    RpcBody(record): RpcBody<D>,
) -> RestResult<Json<BaseOutput<i64>>> {
    debug!(
        kind = D::INDEX_SUFFIX,
        referer = ?referer.as_deref(),
        "Processing save request"
    );

    let saved = state.service().save(record).await?;

    Ok(Json(BaseOutput {
        data: saved.header().id,
        ..BaseOutput::ok()
    }))
}

/// Handler for `POST /api/{kind}/batchSave`.
///
/// Stores every record in one bulk write. An empty array is accepted and
/// stores nothing.
pub async fn batch_save_handler<D: LogDocument>(
    State(state): State<AppState<D>>,
    referer: Referer,
    RpcBody(records): RpcBody<Vec<D>>,
) -> RestResult<Json<BaseOutput<Vec<i64>>>> {
    debug!(
        kind = D::INDEX_SUFFIX,
        count = records.len(),
        referer = ?referer.as_deref(),
        "Processing batch save request"
    );

    let saved = state.service().batch_save(records).await?;
    let ids = saved.iter().filter_map(|d| d.header().id).collect();

    Ok(Json(BaseOutput::success(ids)))
}

/// Handler for `POST /api/{kind}/listPage`.
///
/// A missing `page` returns up to `rows` records from the start of the
/// result set, walking several fetches when `rows` exceeds the engine cap.
/// An explicit `page` with more `rows` than the cap is rejected.
pub async fn list_page_handler<D: LogDocument>(
    State(state): State<AppState<D>>,
    RpcBody(query): RpcBody<Option<LogQuery>>,
) -> RestResult<Json<PageOutput<D>>> {
    let query = query.unwrap_or_default();
    let request = query.page_request();

    debug!(
        kind = D::INDEX_SUFFIX,
        page = ?request.page_number,
        rows = ?request.page_size,
        "Processing listPage request"
    );

    let page = state
        .service()
        .search_page(Some(&query.criteria), &request)
        .await?;

    Ok(Json(PageOutput::from(page)))
}

/// Handler for `POST /api/{kind}/list`.
///
/// Same paging rules as `listPage`, without the counters. A body with no
/// `rows` returns every matching record, newest first.
pub async fn list_handler<D: LogDocument>(
    State(state): State<AppState<D>>,
    RpcBody(query): RpcBody<Option<LogQuery>>,
) -> RestResult<Json<BaseOutput<Vec<D>>>> {
    let query = query.unwrap_or_default();
    let request = query.page_request();

    debug!(
        kind = D::INDEX_SUFFIX,
        page = ?request.page_number,
        rows = ?request.page_size,
        "Processing list request"
    );

    let records = state
        .service()
        .list(Some(&query.criteria), &request)
        .await?;

    Ok(Json(BaseOutput::success(records)))
}

/// Handler for `POST /api/{kind}/deleteAll`.
///
/// Removes every record of the kind.
pub async fn delete_all_handler<D: LogDocument>(
    State(state): State<AppState<D>>,
    referer: Referer,
) -> RestResult<Json<BaseOutput<()>>> {
    debug!(
        kind = D::INDEX_SUFFIX,
        referer = ?referer.as_deref(),
        "Processing deleteAll request"
    );

    state.service().delete_all().await?;

    Ok(Json(BaseOutput::ok()))
}
