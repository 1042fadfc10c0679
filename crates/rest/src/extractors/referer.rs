//! Referer header extractor.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

/// The `Referer` header of a write request.
///
/// Producers send it to identify the page that triggered the log. It is
/// only ever logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Referer(pub Option<String>);

impl Referer {
    /// Reads the header from a header map.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Referer(
            headers
                .get(header::REFERER)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
        )
    }

    /// Returns the header value, if present.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for Referer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Referer::from_headers(&parts.headers))
    }
}
