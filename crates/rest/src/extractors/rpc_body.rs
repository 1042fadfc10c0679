//! JSON body extractor.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::RestError;

/// A JSON request body.
///
/// Unlike `axum::Json`, a malformed body is rejected with a failed
/// envelope rather than a plain-text 4xx, and an empty body is read as
/// JSON `null` so that optional query bodies may be left out entirely.
///
/// # Example
///
/// ```rust,ignore
/// use bizlog_rest::extractors::RpcBody;
///
/// async fn list(RpcBody(query): RpcBody<Option<LogQuery>>) { /* ... */ }
/// ```
#[derive(Debug)]
pub struct RpcBody<T>(pub T);

impl<T> RpcBody<T> {
    /// Consumes the extractor and returns the body.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequest<S> for RpcBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| RestError::BadRequest {
                message: format!("Unreadable body: {}", e),
            })?;

        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_str("null")?
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(RpcBody(value))
    }
}
