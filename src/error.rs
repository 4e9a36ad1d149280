//! Error types for the RemixCuisine engine
//!
//! One error hierarchy for the whole crate:
//! - `thiserror` for the definitions
//! - Domain variants the caller can act on (storage, generation, balance)
//! - Source chaining for storage and HTTP failures
//! - HTTP status code mapping for API responses

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the RemixCuisine engine
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Configuration error: {message}")]
    Config {
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: &'static str },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        key: &'static str,
        message: Cow<'static, str>,
    },

    // ========================================================================
    // Storage Errors
    // ========================================================================
    #[error("Storage read failed for '{key}': {message}")]
    StorageRead {
        key: Cow<'static, str>,
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Storage write failed for '{key}': {message}")]
    StorageWrite {
        key: Cow<'static, str>,
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Migration error: {0}")]
    Migration(String),

    // ========================================================================
    // Recipe Generation Errors
    // ========================================================================
    #[error("Recipe generation request failed: {message}")]
    GenerationRequest {
        message: Cow<'static, str>,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Recipe generation returned unusable output: {message}")]
    GenerationParse { message: Cow<'static, str> },

    #[error("Invalid recipe request: {message}")]
    InvalidRequest { message: Cow<'static, str> },

    // ========================================================================
    // Ledger Errors
    // ========================================================================
    #[error("Insufficient balance: {required} tokens required, {available} available")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("Daily reward already claimed today")]
    AlreadyClaimed,

    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

}

impl Error {
    /// Create a storage read error
    pub fn storage_read(
        key: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::StorageRead {
            key: key.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage write error
    pub fn storage_write(
        key: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::StorageWrite {
            key: key.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a generation request error
    pub fn generation_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::GenerationRequest {
            message: message.into(),
            source: None,
        }
    }

    /// Create a generation parse error
    pub fn generation_parse(message: impl Into<Cow<'static, str>>) -> Self {
        Self::GenerationParse {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    // ========================================================================
    // Error Classification
    // ========================================================================

    /// Returns true if the same action may succeed when retried unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::StorageRead { .. }
                | Error::StorageWrite { .. }
                | Error::GenerationRequest { .. }
                | Error::GenerationParse { .. }
        )
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
            Error::AlreadyClaimed => StatusCode::CONFLICT,
            Error::GenerationRequest { .. } | Error::GenerationParse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } | Error::MissingEnvVar { .. } | Error::InvalidConfig { .. } => {
                "CONFIG_ERROR"
            }
            Error::StorageRead { .. } => "STORAGE_READ_ERROR",
            Error::StorageWrite { .. } | Error::Migration(_) => "STORAGE_WRITE_ERROR",
            Error::GenerationRequest { .. } => "GENERATION_REQUEST_ERROR",
            Error::GenerationParse { .. } => "GENERATION_PARSE_ERROR",
            Error::InvalidRequest { .. } => "BAD_REQUEST",
            Error::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Error::AlreadyClaimed => "ALREADY_CLAIMED",
            Error::NotFound { .. } => "NOT_FOUND",
        }
    }
}

// ============================================================================
// Error Response for API
// ============================================================================

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose storage internals to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message,
                retryable: self.is_retryable(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// From implementations for external error types
// ============================================================================

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Error::GenerationRequest {
                message: "request to the generation endpoint timed out".into(),
                source: Some(err),
            };
        }
        Error::GenerationRequest {
            message: err.to_string().into(),
            source: Some(err),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::invalid_request(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::invalid_request(rejection.body_text())
    }
}
