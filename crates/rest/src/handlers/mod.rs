//! HTTP request handlers.
//!
//! - [`log`] - save, batchSave, listPage, list and deleteAll for a log kind
//! - [`health`] - health check endpoint

pub mod health;
pub mod log;

pub use health::health_handler;
pub use log::{
    batch_save_handler, delete_all_handler, list_handler, list_page_handler, save_handler,
};
