//! State published to the presentation layer.

use crate::backend::CartMode;
use apfol_commerce::Cart;
use serde::Serialize;

/// Drawer and spinner flags. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartUiState {
    /// An operation is in flight or queued.
    pub is_loading: bool,
    /// The cart drawer is open.
    pub is_cart_open: bool,
}

/// Everything a view needs to render the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartView {
    /// `None` until initialization finishes.
    pub cart: Option<Cart>,
    pub ui: CartUiState,
    /// `None` until initialization finishes.
    pub mode: Option<CartMode>,
}

impl CartView {
    /// Units in the cart, zero before initialization.
    pub fn item_count(&self) -> i64 {
        self.cart.as_ref().map_or(0, |cart| cart.line_item_count)
    }
}
