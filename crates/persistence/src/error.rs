//! Error types for the persistence layer.
//!
//! Errors are split into two families: validation errors, which describe a
//! request the service refuses to run, and backend errors, which describe a
//! failure of one of the external collaborators (search engine gateway,
//! label dictionary, id allocator). An empty search result is never an error.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns `true` if the request itself was rejected.
    pub fn is_validation(&self) -> bool {
        matches!(self, StorageError::Validation(_))
    }
}

/// Errors describing a request that cannot be served as asked.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// An explicit page was requested with more rows than the engine allows.
    #[error("page size too large: {requested} rows requested, at most {max} allowed per page")]
    PageSizeTooLarge { requested: u32, max: u32 },

    /// Page numbers are 1-based.
    #[error("invalid page number: {page_number}")]
    InvalidPageNumber { page_number: u32 },

    /// A document reached the gateway without a server-assigned id.
    #[error("log record has no id assigned")]
    MissingRecordId,
}

/// Errors originating from an external collaborator.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// The scroll context is unknown to the engine, or its keep-alive elapsed.
    #[error("scroll context {handle} in {backend_name} has expired or does not exist")]
    ScrollExpired {
        backend_name: String,
        handle: String,
    },

    /// The system clock went backwards while allocating ids.
    #[error("clock moved backwards by {drift_ms}ms, refusing to allocate ids")]
    ClockMovedBackwards { drift_ms: i64 },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Internal {
            backend_name: "unknown".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
