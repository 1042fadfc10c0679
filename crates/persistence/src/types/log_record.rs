//! Log record documents.
//!
//! Every log kind shares a common header ([`LogRecord`]) and may add fields
//! of its own. The write and read paths operate on any [`LogDocument`], so a
//! new log kind only needs a struct and an index suffix.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A document that can be stored in a business log index.
pub trait LogDocument: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Suffix of the index holding documents of this kind
    /// (the full name is `{prefix}-{suffix}`).
    const INDEX_SUFFIX: &'static str;

    /// Returns the common log header.
    fn header(&self) -> &LogRecord;

    /// Returns the common log header for mutation.
    fn header_mut(&mut self) -> &mut LogRecord;
}

/// A business log entry.
///
/// `id` and `create_time` are owned by the server: the id is always replaced
/// on write and the creation time is filled in when the producer left it out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Code of the system that produced the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_code: Option<String>,

    /// Id of the operator who performed the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,

    /// Display name of the operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,

    /// Id of the business entity the action applied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<i64>,

    /// Kind of business entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,

    /// Business code (order number, contract number, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_code: Option<String>,

    /// Operation type code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,

    /// Human readable operation type; resolved from the dictionary when blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type_text: Option<String>,

    /// Market the action belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_id: Option<i64>,

    /// Free-form description of the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Operator notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When the action happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
}

impl LogRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the system code.
    pub fn with_system_code(mut self, system_code: impl Into<String>) -> Self {
        self.system_code = Some(system_code.into());
        self
    }

    /// Sets the operator id.
    pub fn with_operator_id(mut self, operator_id: i64) -> Self {
        self.operator_id = Some(operator_id);
        self
    }

    /// Sets the business id.
    pub fn with_business_id(mut self, business_id: i64) -> Self {
        self.business_id = Some(business_id);
        self
    }

    /// Sets the business type.
    pub fn with_business_type(mut self, business_type: impl Into<String>) -> Self {
        self.business_type = Some(business_type.into());
        self
    }

    /// Sets the business code.
    pub fn with_business_code(mut self, business_code: impl Into<String>) -> Self {
        self.business_code = Some(business_code.into());
        self
    }

    /// Sets the operation type code.
    pub fn with_operation_type(mut self, operation_type: impl Into<String>) -> Self {
        self.operation_type = Some(operation_type.into());
        self
    }

    /// Sets the operation type label.
    pub fn with_operation_type_text(mut self, text: impl Into<String>) -> Self {
        self.operation_type_text = Some(text.into());
        self
    }

    /// Sets the market id.
    pub fn with_market_id(mut self, market_id: i64) -> Self {
        self.market_id = Some(market_id);
        self
    }

    /// Sets the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets the creation time.
    pub fn with_create_time(mut self, create_time: DateTime<Utc>) -> Self {
        self.create_time = Some(create_time);
        self
    }

    /// Returns `true` if the operation type label must be resolved.
    pub fn needs_operation_type_text(&self) -> bool {
        is_blank(self.operation_type_text.as_deref())
    }
}

impl LogDocument for LogRecord {
    const INDEX_SUFFIX: &'static str = "business-logger";

    fn header(&self) -> &LogRecord {
        self
    }

    fn header_mut(&mut self) -> &mut LogRecord {
        self
    }
}

/// A customer account movement log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccountLog {
    /// Common log header.
    #[serde(flatten)]
    pub header: LogRecord,

    /// Fund item id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_item_id: Option<i64>,

    /// Fund item name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_item_name: Option<String>,

    /// Amount moved, in cents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    /// Fund type id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_type_id: Option<i64>,

    /// Fund type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fund_type_name: Option<String>,
}

impl CustomerAccountLog {
    /// Creates an account log around a header.
    pub fn new(header: LogRecord) -> Self {
        Self {
            header,
            ..Default::default()
        }
    }

    /// Sets the fund item.
    pub fn with_fund_item(mut self, id: i64, name: impl Into<String>) -> Self {
        self.fund_item_id = Some(id);
        self.fund_item_name = Some(name.into());
        self
    }

    /// Sets the amount.
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }
}

impl LogDocument for CustomerAccountLog {
    const INDEX_SUFFIX: &'static str = "customer_account-logger";

    fn header(&self) -> &LogRecord {
        &self.header
    }

    fn header_mut(&mut self) -> &mut LogRecord {
        &mut self.header
    }
}

/// Returns `true` for a missing, empty or whitespace-only string.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|s| s.trim().is_empty())
}
