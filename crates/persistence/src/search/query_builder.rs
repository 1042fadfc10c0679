//! Boolean query construction.
//!
//! Translates [`FilterCriteria`] into a conjunctive boolean query. Exact
//! matches go into `must`; time ranges and set membership go into `filter`
//! (they constrain the result without affecting scoring).
//!
//! The builder walks [`FilterDimension::ALL`], a fixed table of
//! (field, clause kind) pairs, so the same criteria always produce the same
//! query and each dimension can be tested on its own.
//!
//! A [`Query`] renders to Elasticsearch Query DSL with [`Query::to_json`] and
//! can be evaluated against a JSON document with [`Query::matches`].

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::types::{FilterCriteria, is_blank};

/// Indexed log fields that can be filtered or sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogField {
    /// `systemCode`
    SystemCode,
    /// `operatorId`
    OperatorId,
    /// `businessId`
    BusinessId,
    /// `businessType`
    BusinessType,
    /// `businessCode`
    BusinessCode,
    /// `operationType`
    OperationType,
    /// `marketId`
    MarketId,
    /// `createTime`
    CreateTime,
}

impl LogField {
    /// Returns the document field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogField::SystemCode => "systemCode",
            LogField::OperatorId => "operatorId",
            LogField::BusinessId => "businessId",
            LogField::BusinessType => "businessType",
            LogField::BusinessCode => "businessCode",
            LogField::OperationType => "operationType",
            LogField::MarketId => "marketId",
            LogField::CreateTime => "createTime",
        }
    }
}

/// Where a clause sits in the boolean query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    /// Must match; contributes to scoring.
    Must,
    /// Must match; no scoring.
    Filter,
}

/// A single constraint on one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Field equals value.
    Term {
        /// Field constrained.
        field: LogField,
        /// Expected value.
        value: Value,
    },
    /// Field is one of the values.
    Terms {
        /// Field constrained.
        field: LogField,
        /// Accepted values.
        values: Vec<Value>,
    },
    /// Field lies within inclusive bounds.
    Range {
        /// Field constrained.
        field: LogField,
        /// Inclusive lower bound.
        gte: Option<Value>,
        /// Inclusive upper bound.
        lte: Option<Value>,
    },
}

impl Clause {
    /// Returns the constrained field.
    pub fn field(&self) -> LogField {
        match self {
            Clause::Term { field, .. } | Clause::Terms { field, .. } | Clause::Range { field, .. } => {
                *field
            }
        }
    }

    /// Renders the clause as Query DSL.
    pub fn to_json(&self) -> Value {
        match self {
            Clause::Term { field, value } => json!({ "term": { field.as_str(): value } }),
            Clause::Terms { field, values } => json!({ "terms": { field.as_str(): values } }),
            Clause::Range { field, gte, lte } => {
                let mut bounds = serde_json::Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".to_string(), gte.clone());
                }
                if let Some(lte) = lte {
                    bounds.insert("lte".to_string(), lte.clone());
                }
                json!({ "range": { field.as_str(): Value::Object(bounds) } })
            }
        }
    }

    /// Evaluates the clause against a document.
    pub fn matches(&self, document: &Value) -> bool {
        let Some(actual) = document.get(self.field().as_str()) else {
            return false;
        };
        match self {
            Clause::Term { value, .. } => compare_values(actual, value) == Some(Ordering::Equal),
            Clause::Terms { values, .. } => values
                .iter()
                .any(|value| compare_values(actual, value) == Some(Ordering::Equal)),
            Clause::Range { gte, lte, .. } => {
                let above = gte.as_ref().is_none_or(|bound| {
                    matches!(
                        compare_values(actual, bound),
                        Some(Ordering::Greater | Ordering::Equal)
                    )
                });
                let below = lte.as_ref().is_none_or(|bound| {
                    matches!(
                        compare_values(actual, bound),
                        Some(Ordering::Less | Ordering::Equal)
                    )
                });
                above && below
            }
        }
    }
}

/// A conjunctive query over log documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Matches every document.
    MatchAll,
    /// All `must` and `filter` clauses must match.
    Bool {
        /// Scoring clauses.
        must: Vec<Clause>,
        /// Non-scoring clauses.
        filter: Vec<Clause>,
    },
}

impl Query {
    /// Returns every clause, `must` first.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        let (must, filter): (&[Clause], &[Clause]) = match self {
            Query::MatchAll => (&[], &[]),
            Query::Bool { must, filter } => (must, filter),
        };
        must.iter().chain(filter.iter())
    }

    /// Renders the query as Query DSL.
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Bool { must, filter } => {
                let mut bool_query = serde_json::Map::new();
                if !must.is_empty() {
                    bool_query.insert(
                        "must".to_string(),
                        Value::Array(must.iter().map(Clause::to_json).collect()),
                    );
                }
                if !filter.is_empty() {
                    bool_query.insert(
                        "filter".to_string(),
                        Value::Array(filter.iter().map(Clause::to_json).collect()),
                    );
                }
                json!({ "bool": Value::Object(bool_query) })
            }
        }
    }

    /// Evaluates the query against a document.
    pub fn matches(&self, document: &Value) -> bool {
        self.clauses().all(|clause| clause.matches(document))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// A sort directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    /// Field to sort on.
    pub field: LogField,
    /// Direction.
    pub order: SortOrder,
}

impl Sort {
    /// Newest first; the order every log search uses.
    pub fn create_time_desc() -> Self {
        Self {
            field: LogField::CreateTime,
            order: SortOrder::Descending,
        }
    }

    /// Renders the directive as Query DSL.
    pub fn to_json(&self) -> Value {
        let order = match self.order {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        json!({ self.field.as_str(): { "order": order } })
    }

    /// Compares two documents; documents missing the field sort last.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let field = self.field.as_str();
        match (a.get(field), b.get(field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ordering = compare_values(a, b).unwrap_or(Ordering::Equal);
                match self.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            }
        }
    }
}

/// A filter dimension: one field of [`FilterCriteria`] and the clause it
/// produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    /// `systemCode` term
    SystemCode,
    /// `operatorId` term
    OperatorId,
    /// `businessId` term
    BusinessId,
    /// `businessType` term
    BusinessType,
    /// `createTime >= start`
    CreateTimeStart,
    /// `createTime <= end`
    CreateTimeEnd,
    /// `businessCode` term
    BusinessCode,
    /// `operationType` term
    OperationType,
    /// `marketId` term
    MarketId,
    /// `marketId` in set
    MarketIdSet,
    /// `operationType` in set
    OperationTypeSet,
}

impl FilterDimension {
    /// Every dimension, in clause emission order.
    pub const ALL: [FilterDimension; 11] = [
        FilterDimension::SystemCode,
        FilterDimension::OperatorId,
        FilterDimension::BusinessId,
        FilterDimension::BusinessType,
        FilterDimension::CreateTimeStart,
        FilterDimension::CreateTimeEnd,
        FilterDimension::BusinessCode,
        FilterDimension::OperationType,
        FilterDimension::MarketId,
        FilterDimension::MarketIdSet,
        FilterDimension::OperationTypeSet,
    ];

    /// Returns the document field this dimension constrains.
    pub fn field(self) -> LogField {
        match self {
            FilterDimension::SystemCode => LogField::SystemCode,
            FilterDimension::OperatorId => LogField::OperatorId,
            FilterDimension::BusinessId => LogField::BusinessId,
            FilterDimension::BusinessType => LogField::BusinessType,
            FilterDimension::CreateTimeStart | FilterDimension::CreateTimeEnd => {
                LogField::CreateTime
            }
            FilterDimension::BusinessCode => LogField::BusinessCode,
            FilterDimension::OperationType | FilterDimension::OperationTypeSet => {
                LogField::OperationType
            }
            FilterDimension::MarketId | FilterDimension::MarketIdSet => LogField::MarketId,
        }
    }

    /// Returns where the clause goes in the boolean query.
    pub fn occur(self) -> Occur {
        match self {
            FilterDimension::CreateTimeStart
            | FilterDimension::CreateTimeEnd
            | FilterDimension::MarketIdSet
            | FilterDimension::OperationTypeSet => Occur::Filter,
            _ => Occur::Must,
        }
    }

    /// Builds the clause for this dimension, or `None` when the criteria
    /// leave it unconstrained.
    pub fn clause(self, criteria: &FilterCriteria) -> Option<Clause> {
        let field = self.field();
        match self {
            FilterDimension::SystemCode => term_str(field, criteria.system_code.as_deref()),
            FilterDimension::OperatorId => term_i64(field, criteria.operator_id),
            FilterDimension::BusinessId => term_i64(field, criteria.business_id),
            FilterDimension::BusinessType => term_str(field, criteria.business_type.as_deref()),
            FilterDimension::CreateTimeStart => {
                criteria.create_time_start.map(|start| Clause::Range {
                    field,
                    gte: Some(time_value(start)),
                    lte: None,
                })
            }
            FilterDimension::CreateTimeEnd => criteria.create_time_end.map(|end| Clause::Range {
                field,
                gte: None,
                lte: Some(time_value(end)),
            }),
            FilterDimension::BusinessCode => term_str(field, criteria.business_code.as_deref()),
            FilterDimension::OperationType => {
                term_str(field, criteria.operation_type.as_deref())
            }
            FilterDimension::MarketId => term_i64(field, criteria.market_id),
            FilterDimension::MarketIdSet => criteria
                .market_id_set
                .as_ref()
                .filter(|ids| !ids.is_empty())
                .map(|ids| Clause::Terms {
                    field,
                    values: ids.iter().map(|id| json!(id)).collect(),
                }),
            FilterDimension::OperationTypeSet => criteria
                .operation_type_set
                .as_ref()
                .filter(|codes| !codes.is_empty())
                .map(|codes| Clause::Terms {
                    field,
                    values: codes.iter().map(|code| json!(code)).collect(),
                }),
        }
    }
}

/// Builds the boolean query for a set of criteria.
///
/// `None`, or criteria that constrain nothing, yield [`Query::MatchAll`].
pub fn build_query(criteria: Option<&FilterCriteria>) -> Query {
    let Some(criteria) = criteria else {
        return Query::MatchAll;
    };

    let mut must = Vec::new();
    let mut filter = Vec::new();
    for dimension in FilterDimension::ALL {
        if let Some(clause) = dimension.clause(criteria) {
            match dimension.occur() {
                Occur::Must => must.push(clause),
                Occur::Filter => filter.push(clause),
            }
        }
    }

    if must.is_empty() && filter.is_empty() {
        Query::MatchAll
    } else {
        Query::Bool { must, filter }
    }
}

fn term_str(field: LogField, value: Option<&str>) -> Option<Clause> {
    if is_blank(value) {
        return None;
    }
    value.map(|v| Clause::Term {
        field,
        value: json!(v),
    })
}

fn term_i64(field: LogField, value: Option<i64>) -> Option<Clause> {
    value.map(|v| Clause::Term {
        field,
        value: json!(v),
    })
}

fn time_value(time: DateTime<Utc>) -> Value {
    // Same representation serde uses for stored documents
    json!(time)
}

/// Orders two JSON scalars: numbers numerically, RFC 3339 timestamps
/// chronologically, other strings lexically.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        (Value::String(a), Value::String(b)) => {
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => Some(a.cmp(&b)),
                _ => Some(a.cmp(b)),
            }
        }
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
