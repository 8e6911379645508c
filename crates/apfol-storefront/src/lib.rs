//! Commerce platform client for the Apfol storefront.
//!
//! Talks to the Shopify Storefront GraphQL Cart API and normalizes its cart
//! object into [`apfol_commerce::Cart`].
//!
//! # Example
//!
//! ```rust,ignore
//! use apfol_storefront::{CommerceClient, Endpoint, StorefrontClient, TimeoutConfig};
//!
//! let endpoint = Endpoint::new("apfol.myshopify.com", token, "2024-01");
//! let client = StorefrontClient::connect(endpoint, TimeoutConfig::default())?;
//!
//! if let Some(cart) = client.create_cart().await {
//!     let cart = client.add_line_item(&cart.id, &variant_id, 1).await;
//! }
//! ```

mod client;
mod error;
pub mod request;
pub mod response;
pub mod retry;
pub mod timeout;
mod transport;

pub use client::StorefrontClient;
pub use error::{GraphqlError, StorefrontError};
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};
pub use timeout::TimeoutConfig;
pub use transport::{Endpoint, GraphqlTransport, HttpTransport, ACCESS_TOKEN_HEADER};

use apfol_commerce::{Cart, CartId, LineItemId, VariantId};
use async_trait::async_trait;

/// Remote cart operations.
///
/// Every method resolves to `None` on failure (network error, expired
/// cart, rejected input); implementations log the cause.
#[async_trait]
pub trait CommerceClient: Send + Sync {
    /// Create a new, empty remote cart.
    async fn create_cart(&self) -> Option<Cart>;

    /// Fetch an existing cart. `None` if it is unknown, expired or completed.
    async fn fetch_cart(&self, cart_id: &CartId) -> Option<Cart>;

    /// Add units of a variant. `quantity` must be at least 1.
    async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Option<Cart>;

    /// Set the quantity of a line.
    async fn update_line_item_quantity(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Option<Cart>;

    /// Remove a line.
    async fn remove_line_item(&self, cart_id: &CartId, line_item_id: &LineItemId) -> Option<Cart>;

    /// Create a one-line cart and return its hosted checkout URL.
    async fn create_direct_checkout(&self, variant_id: &VariantId, quantity: i64) -> Option<String>;
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CommerceClient, Endpoint, GraphqlTransport, HttpTransport, RetryPolicy, StorefrontClient,
        StorefrontError, TimeoutConfig,
    };
}
