//! Core types for log documents, filters and paging.
//!
//! - [`LogRecord`] / [`CustomerAccountLog`] - the stored documents
//! - [`LogDocument`] - what every log kind exposes to the service
//! - [`FilterCriteria`] / [`LogQuery`] - search filters
//! - [`PageRequest`] / [`PageResult`] - paging in and out
//! - [`ScrollConfig`] - engine limits injected into pagination

mod filter;
mod log_record;
mod pagination;

pub use filter::{FilterCriteria, LogQuery};
pub use log_record::{CustomerAccountLog, LogDocument, LogRecord, is_blank};
pub use pagination::{
    DEFAULT_MAX_SIZE, DEFAULT_SCROLL_KEEP_ALIVE, PageRequest, PageResult, ScrollConfig,
    page_count,
};
