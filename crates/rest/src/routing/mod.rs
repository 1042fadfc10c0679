//! Route configuration.
//!
//! Maps HTTP paths to handlers.

pub mod log_routes;

pub use log_routes::{BUSINESS_LOG_PATH, CUSTOMER_ACCOUNT_LOG_PATH, create_routes, kind_routes};
