//! Paging types for log searches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default maximum number of documents the engine returns per request.
pub const DEFAULT_MAX_SIZE: u32 = 10_000;

/// Default lifetime of a scroll context between two fetches.
pub const DEFAULT_SCROLL_KEEP_ALIVE: Duration = Duration::from_millis(5_000);

/// The page a caller asks for.
///
/// A missing `page_number` means "fetch the entire matching result set"; a
/// missing (or zero) `page_size` means "as many as the engine allows per
/// fetch".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// 1-based page number.
    pub page_number: Option<u32>,

    /// Rows per page.
    pub page_size: Option<u32>,
}

impl PageRequest {
    /// Requests the entire result set.
    pub fn all() -> Self {
        Self::default()
    }

    /// Requests a specific page.
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
        }
    }

    /// Requests up to `page_size` rows from the start of the result set.
    pub fn first(page_size: u32) -> Self {
        Self {
            page_number: None,
            page_size: Some(page_size),
        }
    }

    /// Returns the requested page size, treating zero as unset.
    pub fn requested_size(&self) -> Option<u32> {
        self.page_size.filter(|size| *size > 0)
    }
}

/// One page of search results, newest first.
///
/// `total_pages` and `page_number` are computed against the page size that
/// was actually sent to the engine, which differs from the requested size
/// when a large request was split into several fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    /// Number of matching documents.
    pub total_elements: u64,

    /// Number of pages at the effective page size.
    pub total_pages: u64,

    /// The page that was returned, or the number of fetches that were
    /// concatenated when the whole result set was requested.
    pub page_number: u32,

    /// The documents.
    pub items: Vec<T>,
}

impl<T> PageResult<T> {
    /// Creates an empty result.
    pub fn empty(page_number: u32) -> Self {
        Self {
            total_elements: 0,
            total_pages: 0,
            page_number,
            items: Vec::new(),
        }
    }

    /// Returns `true` if no documents were returned.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of documents returned.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Engine limits that govern pagination, read once per search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollConfig {
    /// Largest page size the engine accepts in a single request.
    pub max_size: u32,

    /// How long the engine keeps a scroll context alive between fetches.
    pub keep_alive: Duration,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            keep_alive: DEFAULT_SCROLL_KEEP_ALIVE,
        }
    }
}

impl ScrollConfig {
    /// Creates a config with the given page cap and keep-alive.
    pub fn new(max_size: u32, keep_alive: Duration) -> Self {
        Self {
            max_size,
            keep_alive,
        }
    }

    /// Returns the page cap, never less than one.
    pub fn max_size(&self) -> u32 {
        self.max_size.max(1)
    }
}

/// Number of pages needed for `total` documents at `page_size` per page.
pub fn page_count(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}
