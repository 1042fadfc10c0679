//! Gateway implementations.
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Memory | always | In-process store for development and tests |
//! | Elasticsearch | `elasticsearch` | Production search engine |

pub mod memory;

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;

pub use memory::MemoryGateway;
