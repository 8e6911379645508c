//! Storefront client error types.

use apfol_commerce::CommerceError;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the Storefront API.
///
/// These never leave [`StorefrontClient`](crate::StorefrontClient): each
/// operation logs the error and resolves to `None`.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// Failed to send the request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Could not connect to the store.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphqlError>),

    /// Mutation rejected the input.
    #[error("User errors: {}", .0.join("; "))]
    UserErrors(Vec<String>),

    /// The response carried no cart.
    #[error("Cart not found: {0}")]
    CartNotFound(String),

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A price in the response could not be converted.
    #[error("Invalid money in response: {0}")]
    Money(#[from] CommerceError),

    /// Quantity must be at least 1.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),
}

impl StorefrontError {
    /// HTTP status code, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            StorefrontError::Status { status, .. } => Some(*status),
            StorefrontError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// A GraphQL error returned by the Storefront API.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

fn format_graphql_errors(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let err = StorefrontError::GraphQL(vec![
            GraphqlError {
                message: "Field not found".to_string(),
                path: vec![],
            },
            GraphqlError {
                message: "Invalid ID".to_string(),
                path: vec![],
            },
        ]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field not found; Invalid ID"
        );
    }

    #[test]
    fn test_status_accessor() {
        let err = StorefrontError::Status {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(StorefrontError::Timeout.status(), None);
    }
}
