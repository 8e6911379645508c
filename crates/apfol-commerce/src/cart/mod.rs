//! Shopping cart module.
//!
//! Contains types for cart, line items, pricing, and product-page quotes.

mod cart;
pub mod pricing;
mod promotion;

pub use cart::{Cart, LineItem, ProductImage, VariantSnapshot, MAX_QUANTITY_PER_ITEM};
pub use pricing::CartPricing;
pub use promotion::{PriceQuote, QuoteRule};
