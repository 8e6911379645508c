//! Commerce error types.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur in cart and pricing operations.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CommerceError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Item not in cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Two lines hold the same variant or share an id.
    #[error("Duplicate cart line: {0}")]
    DuplicateLine(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Unknown currency code.
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// A monetary amount could not be parsed.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
