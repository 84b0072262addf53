// src/application/error_handling.rs
//
// Error classification for callers
//
// ARCHITECTURE:
// - Maps internal errors → caller-friendly responses
// - Consistent shape for the CLI and any embedding UI
// - Never exposes credentials or raw backend payloads
// - Logs what it hides

use log::error;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
    /// Whether trying again later may succeed
    pub retryable: bool,
}

/// Error categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Document does not exist (404)
    NotFound,

    /// Concurrent change won, or id already taken (409)
    Conflict,

    /// Network failure or timeout
    Transport,

    /// Store rejected the request (auth, quota, 5xx)
    Backend,

    /// Invalid input
    Validation,

    /// Missing or malformed configuration
    Configuration,

    /// Other/unknown error
    Internal,
}

impl ErrorResponse {
    /// Create error response from AppError
    pub fn from_app_error(app_error: AppError) -> Self {
        let retryable = app_error.is_transient();

        let (error_type, message, details) = match app_error {
            AppError::NotFound => (ErrorType::NotFound, "Document not found".to_string(), None),

            AppError::Conflict(reason) => (
                ErrorType::Conflict,
                "Changed concurrently, try again".to_string(),
                Some(reason),
            ),

            AppError::Transport(transport_error) => {
                error!("Transport error: {:?}", transport_error);
                (
                    ErrorType::Transport,
                    "Could not reach the store".to_string(),
                    Some(transport_error.to_string()),
                )
            }

            AppError::Backend { status, message } => {
                error!("Backend error {}: {}", status, message);
                (
                    ErrorType::Backend,
                    format!("Store rejected the request ({})", status),
                    None,
                )
            }

            AppError::Domain(domain_error) => (
                ErrorType::Validation,
                "Invalid input".to_string(),
                Some(domain_error.to_string()),
            ),

            AppError::Config(message) => (
                ErrorType::Configuration,
                "Store is not configured".to_string(),
                Some(message),
            ),

            AppError::Serialization(serde_error) => {
                error!("Serialization error: {:?}", serde_error);
                (
                    ErrorType::Internal,
                    "Malformed document".to_string(),
                    None,
                )
            }

            AppError::Other(message) => {
                error!("Other error: {}", message);
                (ErrorType::Internal, message, None)
            }
        };

        Self {
            success: false,
            error_type,
            message,
            details,
            retryable,
        }
    }
}

/// Helper trait to convert Results into serialized ErrorResponse strings
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, String>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, String> {
        self.map_err(|e| {
            let error_response = ErrorResponse::from_app_error(e);
            serde_json::to_string(&error_response).unwrap_or_else(|_| "Internal error".to_string())
        })
    }
}
