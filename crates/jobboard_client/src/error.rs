//! Client errors.
//!
//! Every failure reaching the caller is a single [`ClientError`]. GraphQL
//! `errors` arrays are folded into one message, one line per error.

use crate::client::GraphQLError;
use jobboard_core::ErrorCode;
use thiserror::Error;

/// Error returned by every client operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{code}] {message}")]
pub struct ClientError {
    /// Typed error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
}

impl ClientError {
    /// Creates a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Folds GraphQL errors into a single error.
    pub fn from_graphql(errors: &[GraphQLError]) -> Self {
        let message = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(ErrorCode::ExecutionError, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    pub fn timeout() -> Self {
        Self::new(ErrorCode::Timeout, "Request timed out")
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        let code = if status == 401 {
            ErrorCode::Unauthorized
        } else {
            ErrorCode::HttpError
        };
        Self::new(code, format!("HTTP {}: {}", status, message.into()))
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidUrl, message)
    }

    pub fn serialize(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializeError, message)
    }

    pub fn deserialize(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DeserializeError, message)
    }

    pub fn no_data() -> Self {
        Self::new(ErrorCode::NoData, "No data in response")
    }

    /// Returns true if the server refused the caller's credentials or the
    /// operation required a logged-in user.
    ///
    /// A rejected token arrives as HTTP 401 and carries
    /// [`ErrorCode::Unauthorized`]. A missing login is reported by the
    /// resolver inside a 200 response, and GraphQL errors on the wire carry
    /// only a message, so that case is recognised by a line reading exactly
    /// `Unauthorized`, the message the server uses for it.
    pub fn is_unauthorized(&self) -> bool {
        self.code == ErrorCode::Unauthorized
            || self.message.lines().any(|line| line == "Unauthorized")
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout()
        } else if let Some(status) = e.status() {
            Self::http(status.as_u16(), e.to_string())
        } else if e.is_decode() {
            Self::deserialize(e.to_string())
        } else {
            Self::network(e.to_string())
        }
    }
}

/// Type alias for client results.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn gql_error(message: &str) -> GraphQLError {
        GraphQLError {
            message: message.to_string(),
            path: None,
        }
    }

    #[test]
    fn test_graphql_errors_are_joined() {
        let err = ClientError::from_graphql(&[gql_error("first"), gql_error("second")]);
        assert_eq!(err.code, ErrorCode::ExecutionError);
        assert_eq!(err.message, "first\nsecond");
        assert_eq!(err.to_string(), "[EXECUTION_ERROR] first\nsecond");
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(ClientError::from_graphql(&[gql_error("Unauthorized")]).is_unauthorized());
        assert!(ClientError::http(401, "Invalid token").is_unauthorized());
        assert!(!ClientError::http(500, "boom").is_unauthorized());
        assert!(!ClientError::from_graphql(&[gql_error("Title is required")]).is_unauthorized());

        // Only a whole line counts; other messages mentioning the word do not.
        let mixed =
            ClientError::from_graphql(&[gql_error("Title is required"), gql_error("Unauthorized")]);
        assert!(mixed.is_unauthorized());
        assert!(!ClientError::from_graphql(&[gql_error("Unauthorized access log rotated")])
            .is_unauthorized());
    }
}
