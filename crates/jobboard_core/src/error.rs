//! Error codes and domain errors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Typed error codes shared by the server and the client.
///
/// Codes classify failures internally; the GraphQL wire format only carries
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // Network errors
    NetworkError,
    Timeout,

    // Protocol errors
    HttpError,
    InvalidUrl,
    InvalidResponse,

    // GraphQL errors
    ExecutionError,
    NoData,

    // Serialization errors
    SerializeError,
    DeserializeError,

    // Auth errors
    Unauthorized,

    // Resource errors
    NotFound,
    ValidationError,

    InternalError,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::HttpError => "HTTP_ERROR",
            Self::InvalidUrl => "INVALID_URL",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::ExecutionError => "EXECUTION_ERROR",
            Self::NoData => "NO_DATA",
            Self::SerializeError => "SERIALIZE_ERROR",
            Self::DeserializeError => "DESERIALIZE_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the failure happened before a response was received.
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::NetworkError | Self::Timeout | Self::InvalidUrl)
    }

    /// Returns true if this is a client error (4xx equivalent).
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::NotFound | Self::ValidationError | Self::InvalidUrl
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Business rule violations and data loading failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Failed to load {path}: {message}")]
    DataLoad { path: PathBuf, message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the error code this error maps to.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized => ErrorCode::Unauthorized,
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::DataLoad { .. } => ErrorCode::InternalError,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_properties() {
        assert!(ErrorCode::Timeout.is_transport());
        assert!(!ErrorCode::ExecutionError.is_transport());

        assert!(ErrorCode::Unauthorized.is_client_error());
        assert!(!ErrorCode::InternalError.is_client_error());
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::DeserializeError).unwrap();
        assert_eq!(json, "\"DESERIALIZE_ERROR\"");
        assert_eq!(ErrorCode::NoData.to_string(), "NO_DATA");
    }

    #[test]
    fn test_unauthorized_message() {
        let err = DomainError::Unauthorized;
        assert_eq!(err.to_string(), "Unauthorized");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("title", "Title is required");
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert!(err.to_string().contains("Title is required"));
    }
}
