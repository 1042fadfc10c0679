//! Common test utilities for RPC testing.
//!
//! - [`harness`] - test servers over in-memory or failing gateways
//! - [`fixtures`] - request bodies

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
