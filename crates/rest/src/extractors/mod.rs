//! Axum extractors for RPC requests.
//!
//! - [`RpcBody`] - JSON request body whose rejection is a failed envelope
//! - [`Referer`] - the caller's `Referer` header, if any

mod referer;
mod rpc_body;

pub use referer::Referer;
pub use rpc_body::RpcBody;
