//! Read path: query construction and scroll pagination.
//!
//! - [`query_builder`] turns [`FilterCriteria`](crate::types::FilterCriteria)
//!   into a boolean [`Query`]
//! - [`ScrollSession`] owns a server-side scroll context
//! - [`Paginator`] serves page requests over one or more scroll fetches

pub mod query_builder;
mod paginator;
mod scroll;

pub use paginator::{FetchPlan, Paginator};
pub use query_builder::{
    Clause, FilterDimension, LogField, Occur, Query, Sort, SortOrder, build_query,
};
pub use scroll::ScrollSession;
