//! Scroll-based pagination.
//!
//! The search engine refuses single requests for more than `max_size`
//! documents. [`Paginator`] hides that limit by walking a scroll and
//! stitching batches together:
//!
//! | `page_number` | `page_size`         | plan                                          |
//! |---------------|---------------------|-----------------------------------------------|
//! | set           | `> max_size`        | rejected                                      |
//! | `0`           | any                 | rejected                                      |
//! | set           | `<= max_size`       | walk `page_number` batches, keep the last one |
//! | unset         | `> max_size`        | `ceil(size / max_size)` batches, concatenated |
//! | unset         | `<= max_size`       | one batch                                     |
//! | unset         | unset               | every batch until the result set is exhausted |
//!
//! Paging metadata in the result is computed against the page size actually
//! sent to the engine, not the one the caller asked for.

use tracing::debug;

use crate::core::{DynGateway, ScrollRequest};
use crate::error::{StorageResult, ValidationError};
use crate::search::query_builder::build_query;
use crate::search::scroll::ScrollSession;
use crate::types::{FilterCriteria, LogDocument, PageRequest, PageResult, ScrollConfig};

/// How a [`PageRequest`] will be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    /// Walk to `page_number` and return that batch alone.
    Single {
        /// 1-based page to return.
        page_number: u32,
        /// Batch size.
        page_size: u32,
    },
    /// Concatenate up to `fetch_count` batches, capped at `limit` documents.
    Bounded {
        /// Number of batches to fetch.
        fetch_count: u32,
        /// Batch size.
        page_size: u32,
        /// Most documents to return.
        limit: u32,
    },
    /// Concatenate every batch.
    Exhaust {
        /// Batch size.
        page_size: u32,
    },
}

impl FetchPlan {
    /// Decides how to serve `request` given the engine's per-request cap.
    pub fn resolve(request: &PageRequest, max_size: u32) -> Result<Self, ValidationError> {
        let max_size = max_size.max(1);

        if let Some(page_number) = request.page_number {
            if let Some(size) = request.requested_size()
                && size > max_size
            {
                return Err(ValidationError::PageSizeTooLarge {
                    requested: size,
                    max: max_size,
                });
            }
            if page_number == 0 {
                return Err(ValidationError::InvalidPageNumber { page_number });
            }
            return Ok(FetchPlan::Single {
                page_number,
                page_size: request.requested_size().unwrap_or(max_size),
            });
        }

        Ok(match request.requested_size() {
            None => FetchPlan::Exhaust {
                page_size: max_size,
            },
            Some(size) if size > max_size => FetchPlan::Bounded {
                fetch_count: size.div_ceil(max_size),
                page_size: max_size,
                limit: size,
            },
            Some(size) => FetchPlan::Bounded {
                fetch_count: 1,
                page_size: size,
                limit: size,
            },
        })
    }

    /// Batch size sent to the engine.
    pub fn page_size(&self) -> u32 {
        match self {
            FetchPlan::Single { page_size, .. }
            | FetchPlan::Bounded { page_size, .. }
            | FetchPlan::Exhaust { page_size } => *page_size,
        }
    }

    fn keeps_all(&self) -> bool {
        !matches!(self, FetchPlan::Single { .. })
    }
}

/// Serves [`PageRequest`]s over a gateway's scroll protocol.
pub struct Paginator<D: LogDocument> {
    gateway: DynGateway<D>,
    config: ScrollConfig,
}

impl<D: LogDocument> Paginator<D> {
    /// Creates a paginator.
    pub fn new(gateway: DynGateway<D>, config: ScrollConfig) -> Self {
        Self { gateway, config }
    }

    /// Returns the limits this paginator works with.
    pub fn config(&self) -> ScrollConfig {
        self.config
    }

    /// Runs a search, newest first.
    ///
    /// Every scroll that is opened is cleared before this returns, including
    /// when the result set is empty or a later fetch fails.
    pub async fn search(
        &self,
        criteria: Option<&FilterCriteria>,
        request: &PageRequest,
    ) -> StorageResult<PageResult<D>> {
        let config = self.config;
        let plan = FetchPlan::resolve(request, config.max_size())?;
        let scroll_request = ScrollRequest::new(build_query(criteria), plan.page_size());

        debug!(
            backend = self.gateway.backend_name(),
            ?plan,
            "Starting paginated search"
        );

        let (mut session, first) =
            ScrollSession::open(self.gateway.clone(), config.keep_alive, &scroll_request).await?;
        let collected = collect(&mut session, first, &plan).await;
        session.close().await;
        collected
    }
}

async fn collect<D: LogDocument>(
    session: &mut ScrollSession<D>,
    first: Vec<D>,
    plan: &FetchPlan,
) -> StorageResult<PageResult<D>> {
    let total_elements = session.total_elements();
    let total_pages = session.total_pages();

    if total_elements == 0 {
        let page_number = match plan {
            FetchPlan::Single { page_number, .. } => *page_number,
            _ => 1,
        };
        return Ok(PageResult::empty(page_number));
    }

    let (fetch_count, limit) = match *plan {
        FetchPlan::Single { page_number, .. } => (page_number, None),
        FetchPlan::Bounded {
            fetch_count, limit, ..
        } => (fetch_count, Some(limit)),
        FetchPlan::Exhaust { .. } => (
            u32::try_from(total_pages.max(1)).unwrap_or(u32::MAX),
            None,
        ),
    };

    let mut items = first;
    let mut walked: u32 = 1;
    while walked < fetch_count {
        let batch = session.next_batch().await?;
        walked += 1;
        if batch.is_empty() {
            if !plan.keeps_all() {
                items.clear();
            }
            break;
        }
        if plan.keeps_all() {
            items.extend(batch);
        } else {
            items = batch;
        }
    }

    if let Some(limit) = limit {
        items.truncate(limit as usize);
    }

    let page_number = match *plan {
        FetchPlan::Single { page_number, .. } => page_number,
        FetchPlan::Bounded { fetch_count, .. } => fetch_count,
        FetchPlan::Exhaust { .. } => walked,
    };
    Ok(PageResult {
        total_elements,
        total_pages,
        page_number,
        items,
    })
}
