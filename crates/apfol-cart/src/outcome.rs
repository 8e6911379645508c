//! Results of cart operations.

use apfol_commerce::{CommerceError, LineItemId};
use serde::Serialize;
use thiserror::Error;

/// Why a cart operation left the cart unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum CartFailure {
    /// Quantity must be at least 1.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// No line with this id in the cart.
    #[error("Item not in cart: {0}")]
    UnknownLineItem(LineItemId),

    /// The commerce platform did not accept the operation.
    #[error("Remote {0} failed")]
    RemoteRejected(String),

    /// Local cart rules rejected the operation.
    #[error(transparent)]
    Commerce(CommerceError),
}

impl From<CommerceError> for CartFailure {
    fn from(e: CommerceError) -> Self {
        match e {
            CommerceError::InvalidQuantity(q) => CartFailure::InvalidQuantity(q),
            CommerceError::ItemNotInCart(id) => CartFailure::UnknownLineItem(LineItemId::new(id)),
            other => CartFailure::Commerce(other),
        }
    }
}

/// Outcome of a cart mutation.
///
/// Single-step mutations are all or nothing. A remote
/// [`clear`](crate::CartStore::clear) is the one multi-step operation: it
/// reports `Unchanged` when any removal fails, but lines removed before the
/// failure stay removed and the published cart reflects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "failure", rename_all = "snake_case")]
pub enum CartOutcome {
    /// The cart changed.
    Updated,
    /// The operation failed. The cart is as before, except for the lines a
    /// failed remote clear had already removed.
    Unchanged(CartFailure),
}

impl CartOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, CartOutcome::Updated)
    }

    /// The failure, if the cart was left unchanged.
    pub fn failure(&self) -> Option<&CartFailure> {
        match self {
            CartOutcome::Updated => None,
            CartOutcome::Unchanged(failure) => Some(failure),
        }
    }
}

impl From<Result<(), CartFailure>> for CartOutcome {
    fn from(result: Result<(), CartFailure>) -> Self {
        match result {
            Ok(()) => CartOutcome::Updated,
            Err(failure) => CartOutcome::Unchanged(failure),
        }
    }
}
