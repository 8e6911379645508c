//! Storefront domain types and logic for Apfol.
//!
//! - **Catalog**: the products sold and their product-page promotions
//! - **Cart**: line items, the bundle Pricing Engine, price quotes
//! - **Checkout**: handoff to the platform's hosted checkout
//!
//! Everything here is pure: no I/O, no async.
//!
//! # Example
//!
//! ```rust
//! use apfol_commerce::prelude::*;
//!
//! let catalog = Catalog::builtin(&VariantIds::default());
//! let product = catalog.by_handle("watchintosh").unwrap();
//!
//! let mut cart = Cart::empty_local();
//! cart.add_line(&product.title, product.snapshot(&product.variant_id), 3)
//!     .unwrap();
//!
//! assert_eq!(cart.subtotal_price.display(), "$117.00");
//! assert_eq!(cart.discount_amount.display(), "$39.00");
//! assert_eq!(cart.total_price.display(), "$78.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod cart;
pub mod checkout;

pub use cart::{Cart, LineItem};
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, CurrencyCode, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, Product, VariantIds};

    // Cart
    pub use crate::cart::{
        Cart, CartPricing, LineItem, PriceQuote, ProductImage, QuoteRule, VariantSnapshot,
        MAX_QUANTITY_PER_ITEM,
    };

    // Checkout
    pub use crate::checkout::{permalink_url, CheckoutHandoff, CHECKOUT_UNAVAILABLE_NOTICE};
}
