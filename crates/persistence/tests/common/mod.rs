//! Test infrastructure for the persistence layer.
//!
//! Provides instrumented collaborators (a gateway that records every scroll
//! call, a label resolver that counts lookups) and log fixtures.

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;

// Re-export commonly used items
pub use fixtures::*;
pub use harness::*;
