//! Filter criteria for log searches.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pagination::PageRequest;

/// Optional filters over the indexed log fields.
///
/// Every field is optional. A missing field, a blank string and an empty set
/// all mean "do not constrain this field".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Exact system code.
    #[serde(default)]
    pub system_code: Option<String>,

    /// Exact operator id.
    #[serde(default)]
    pub operator_id: Option<i64>,

    /// Exact business id.
    #[serde(default)]
    pub business_id: Option<i64>,

    /// Exact business type.
    #[serde(default)]
    pub business_type: Option<String>,

    /// Exact business code.
    #[serde(default)]
    pub business_code: Option<String>,

    /// Exact operation type.
    #[serde(default)]
    pub operation_type: Option<String>,

    /// Exact market id.
    #[serde(default)]
    pub market_id: Option<i64>,

    /// Inclusive lower bound on the creation time.
    #[serde(default)]
    pub create_time_start: Option<DateTime<Utc>>,

    /// Inclusive upper bound on the creation time.
    #[serde(default)]
    pub create_time_end: Option<DateTime<Utc>>,

    /// Market must be one of these.
    #[serde(default)]
    pub market_id_set: Option<BTreeSet<i64>>,

    /// Operation type must be one of these.
    #[serde(default)]
    pub operation_type_set: Option<BTreeSet<String>>,
}

impl FilterCriteria {
    /// Creates criteria that match everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters on the system code.
    pub fn with_system_code(mut self, system_code: impl Into<String>) -> Self {
        self.system_code = Some(system_code.into());
        self
    }

    /// Filters on the operator id.
    pub fn with_operator_id(mut self, operator_id: i64) -> Self {
        self.operator_id = Some(operator_id);
        self
    }

    /// Filters on the business id.
    pub fn with_business_id(mut self, business_id: i64) -> Self {
        self.business_id = Some(business_id);
        self
    }

    /// Filters on the business type.
    pub fn with_business_type(mut self, business_type: impl Into<String>) -> Self {
        self.business_type = Some(business_type.into());
        self
    }

    /// Filters on the business code.
    pub fn with_business_code(mut self, business_code: impl Into<String>) -> Self {
        self.business_code = Some(business_code.into());
        self
    }

    /// Filters on the operation type.
    pub fn with_operation_type(mut self, operation_type: impl Into<String>) -> Self {
        self.operation_type = Some(operation_type.into());
        self
    }

    /// Filters on the market id.
    pub fn with_market_id(mut self, market_id: i64) -> Self {
        self.market_id = Some(market_id);
        self
    }

    /// Restricts the creation time to `[start, end]`; either bound may be open.
    pub fn with_create_time(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.create_time_start = start;
        self.create_time_end = end;
        self
    }

    /// Restricts the market to a set of ids.
    pub fn with_market_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.market_id_set = Some(ids.into_iter().collect());
        self
    }

    /// Restricts the operation type to a set of codes.
    pub fn with_operation_types<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operation_type_set = Some(codes.into_iter().map(Into::into).collect());
        self
    }
}

/// A log query as submitted over RPC: the filters plus the paging pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    /// Filters.
    #[serde(flatten)]
    pub criteria: FilterCriteria,

    /// 1-based page number; absent means "the whole result set".
    #[serde(default)]
    pub page: Option<u32>,

    /// Rows per page.
    #[serde(default)]
    pub rows: Option<u32>,
}

impl LogQuery {
    /// Returns the paging part of the query.
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page_number: self.page,
            page_size: self.rows,
        }
    }
}
