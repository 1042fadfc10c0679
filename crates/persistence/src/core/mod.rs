//! Core traits for the collaborators of the log service.
//!
//! - [`PersistenceGateway`] - save, delete and scroll primitives of the
//!   search engine
//! - [`LabelResolver`] - operation type code to label dictionary
//! - [`IdAllocator`] - server-side id generation
//!
//! The service only talks to these traits, so backends can be swapped
//! (in-memory for development and tests, Elasticsearch in production)
//! without touching the write and read paths.

mod enrichment;
mod gateway;
mod id;

pub use enrichment::{DictionaryLabelResolver, LabelResolver};
pub use gateway::{DynGateway, PersistenceGateway, ScrollHandle, ScrollPage, ScrollRequest};
pub use id::{IdAllocator, SNOWFLAKE_EPOCH_MS, SnowflakeIdAllocator};
