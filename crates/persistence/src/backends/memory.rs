//! In-process gateway.
//!
//! Keeps documents in a vector and implements the scroll protocol the way a
//! search engine does: a scroll snapshots the sorted matches, hands out one
//! batch per call and expires when its keep-alive elapses between calls.
//! Used for development and tests; nothing survives a restart.

use std::collections::{HashMap, VecDeque};
use std::marker::PhantomData;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use uuid::Uuid;

use crate::core::{PersistenceGateway, ScrollHandle, ScrollPage, ScrollRequest};
use crate::error::{BackendError, StorageResult, ValidationError};
use crate::types::{LogDocument, page_count};

const BACKEND_NAME: &str = "memory";

struct ScrollContext {
    remaining: VecDeque<Value>,
    page_size: usize,
    total_elements: u64,
    total_pages: u64,
    expires_at: Instant,
}

/// A [`PersistenceGateway`] holding documents in memory.
pub struct MemoryGateway<D: LogDocument> {
    documents: RwLock<Vec<Value>>,
    scrolls: Mutex<HashMap<String, ScrollContext>>,
    _kind: PhantomData<fn() -> D>,
}

impl<D: LogDocument> Default for MemoryGateway<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: LogDocument> MemoryGateway<D> {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            scrolls: Mutex::new(HashMap::new()),
            _kind: PhantomData,
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    /// Number of scroll contexts that have not been cleared.
    pub fn open_scrolls(&self) -> usize {
        self.scrolls.lock().len()
    }

    fn upsert(documents: &mut Vec<Value>, document: Value) -> StorageResult<()> {
        let id = document
            .get("id")
            .and_then(Value::as_i64)
            .ok_or(ValidationError::MissingRecordId)?;
        match documents
            .iter_mut()
            .find(|d| d.get("id").and_then(Value::as_i64) == Some(id))
        {
            Some(existing) => *existing = document,
            None => documents.push(document),
        }
        Ok(())
    }

    fn take_batch(context: &mut ScrollContext) -> StorageResult<Vec<D>> {
        let count = context.page_size.min(context.remaining.len());
        context
            .remaining
            .drain(..count)
            .map(|value| serde_json::from_value(value).map_err(Into::into))
            .collect()
    }
}

#[async_trait]
impl<D: LogDocument> PersistenceGateway<D> for MemoryGateway<D> {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn save(&self, document: &D) -> StorageResult<()> {
        let value = serde_json::to_value(document)?;
        Self::upsert(&mut self.documents.write(), value)
    }

    async fn save_all(&self, documents: &[D]) -> StorageResult<()> {
        let values = documents
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        let mut stored = self.documents.write();
        for value in values {
            Self::upsert(&mut stored, value)?;
        }
        Ok(())
    }

    async fn delete_all(&self) -> StorageResult<()> {
        self.documents.write().clear();
        Ok(())
    }

    async fn start_scroll(
        &self,
        keep_alive: Duration,
        request: &ScrollRequest,
    ) -> StorageResult<ScrollPage<D>> {
        let mut matches: Vec<Value> = self
            .documents
            .read()
            .iter()
            .filter(|doc| request.query.matches(doc))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            request
                .sort
                .iter()
                .map(|sort| sort.compare(a, b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let page_size = request.page_size.max(1);
        let total_elements = matches.len() as u64;
        let mut context = ScrollContext {
            remaining: matches.into(),
            page_size: page_size as usize,
            total_elements,
            total_pages: page_count(total_elements, page_size),
            expires_at: Instant::now() + keep_alive,
        };
        let items = Self::take_batch(&mut context)?;

        let handle = ScrollHandle::new(Uuid::new_v4().to_string());
        let page = ScrollPage {
            handle: handle.clone(),
            items,
            total_elements: context.total_elements,
            total_pages: context.total_pages,
        };
        let mut scrolls = self.scrolls.lock();
        let now = Instant::now();
        scrolls.retain(|_, open| open.expires_at >= now);
        scrolls.insert(handle.as_str().to_string(), context);
        Ok(page)
    }

    async fn continue_scroll(
        &self,
        handle: &ScrollHandle,
        keep_alive: Duration,
    ) -> StorageResult<ScrollPage<D>> {
        let mut scrolls = self.scrolls.lock();
        let expired = || BackendError::ScrollExpired {
            backend_name: BACKEND_NAME.to_string(),
            handle: handle.to_string(),
        };

        let context = scrolls.get_mut(handle.as_str()).ok_or_else(expired)?;
        let now = Instant::now();
        if now > context.expires_at {
            scrolls.remove(handle.as_str());
            return Err(expired().into());
        }
        context.expires_at = now + keep_alive;

        Ok(ScrollPage {
            handle: handle.clone(),
            items: Self::take_batch(context)?,
            total_elements: context.total_elements,
            total_pages: context.total_pages,
        })
    }

    async fn clear_scroll(&self, handle: &ScrollHandle) -> StorageResult<()> {
        self.scrolls.lock().remove(handle.as_str());
        Ok(())
    }
}
