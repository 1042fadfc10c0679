//! Response envelopes.
//!
//! Every RPC answers with a [`BaseOutput`]; paged searches answer with a
//! [`PageOutput`], which adds the paging counters. Success is signalled by
//! code `"200"`, failure by code `"5000"`.

use bizlog_persistence::types::PageResult;
use serde::{Deserialize, Serialize};

/// Envelope code of a successful call.
pub const CODE_OK: &str = "200";

/// Envelope code of a failed call.
pub const CODE_FAILED: &str = "5000";

/// The common response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseOutput<T> {
    /// `"200"` or `"5000"`.
    pub code: String,

    /// Human readable outcome.
    pub message: String,

    /// Whether the call succeeded.
    pub success: bool,

    /// Payload, absent on failure.
    pub data: Option<T>,
}

impl<T> BaseOutput<T> {
    /// A successful envelope carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            code: CODE_OK.to_string(),
            message: "OK".to_string(),
            success: true,
            data: Some(data),
        }
    }

    /// A successful envelope with no payload.
    pub fn ok() -> Self {
        Self {
            code: CODE_OK.to_string(),
            message: "OK".to_string(),
            success: true,
            data: None,
        }
    }

    /// A failed envelope.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: CODE_FAILED.to_string(),
            message: message.into(),
            success: false,
            data: None,
        }
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOutput<T> {
    /// `"200"` or `"5000"`.
    pub code: String,

    /// Human readable outcome.
    pub message: String,

    /// Whether the call succeeded.
    pub success: bool,

    /// The documents on this page.
    pub data: Vec<T>,

    /// Page number reported by the pagination engine.
    pub page_num: u32,

    /// Number of matching documents.
    pub total: u64,

    /// Number of pages at the effective page size.
    pub pages: u64,
}

impl<T> From<PageResult<T>> for PageOutput<T> {
    fn from(page: PageResult<T>) -> Self {
        Self {
            code: CODE_OK.to_string(),
            message: "OK".to_string(),
            success: true,
            data: page.items,
            page_num: page.page_number,
            total: page.total_elements,
            pages: page.total_pages,
        }
    }
}
