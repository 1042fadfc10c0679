//! Error types for the RPC surface.
//!
//! Every failure is rendered as a failed [`BaseOutput`] envelope with code
//! `"5000"`, never as a bare transport error. The HTTP status tells callers
//! whether retrying can help:
//!
//! | Storage Error | HTTP Status |
//! |--------------|-------------|
//! | Validation | 200 |
//! | Backend | 500 |
//!
//! [`BaseOutput`]: crate::responses::BaseOutput

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bizlog_persistence::error::StorageError;
use thiserror::Error;
use tracing::{debug, error};

use crate::responses::BaseOutput;

/// The error type for RPC operations.
#[derive(Debug, Error)]
pub enum RestError {
    /// The request was understood but cannot be served as asked.
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// A collaborator (search engine, dictionary, id allocator) failed.
    #[error("Internal error: {message}")]
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// HTTP status used for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::OK,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the failed envelope.
    pub fn message(&self) -> &str {
        match self {
            RestError::BadRequest { message } | RestError::InternalError { message } => message,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        match &self {
            RestError::BadRequest { message } => debug!(%message, "Rejected request"),
            RestError::InternalError { message } => error!(%message, "Request failed"),
        }
        let body = BaseOutput::<()>::failure(self.message());
        (self.status(), Json(body)).into_response()
    }
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(e) => RestError::BadRequest {
                message: e.to_string(),
            },
            StorageError::Backend(e) => RestError::InternalError {
                message: e.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::BadRequest {
            message: format!("Invalid JSON: {}", err),
        }
    }
}

/// Result type alias for RPC operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bizlog_persistence::error::{BackendError, ValidationError};

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: RestError = StorageError::from(ValidationError::PageSizeTooLarge {
            requested: 25_000,
            max: 10_000,
        })
        .into();
        assert!(matches!(err, RestError::BadRequest { .. }));
        assert_eq!(err.status(), StatusCode::OK);
        assert!(err.message().contains("page size too large"));
    }

    #[test]
    fn test_backend_maps_to_internal_error() {
        let err: RestError = StorageError::from(BackendError::QueryError {
            message: "shard failure".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal error: query execution failed: shard failure");
    }

    #[test]
    fn test_invalid_json_display() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RestError::from(parse_err);
        assert!(err.to_string().starts_with("Bad request: Invalid JSON"));
    }
}
