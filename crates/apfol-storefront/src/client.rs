//! Storefront Cart API client.

use crate::request::GraphqlRequest;
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;
use crate::transport::{Endpoint, GraphqlTransport, HttpTransport};
use crate::{CommerceClient, StorefrontError};
use apfol_commerce::{Cart, CartId, LineItemId, VariantId};
use async_trait::async_trait;
use tracing::{debug, warn};

/// [`CommerceClient`] backed by the Shopify Storefront GraphQL Cart API.
///
/// Every failure is logged and reported as `None`; callers decide how to
/// fall back.
#[derive(Debug, Clone)]
pub struct StorefrontClient<T = HttpTransport> {
    transport: T,
    retry: RetryPolicy,
}

impl StorefrontClient<HttpTransport> {
    /// Connect to a store over HTTPS.
    pub fn connect(endpoint: Endpoint, timeouts: TimeoutConfig) -> Result<Self, StorefrontError> {
        Ok(Self::with_transport(HttpTransport::new(endpoint, timeouts)?))
    }
}

impl<T: GraphqlTransport> StorefrontClient<T> {
    /// Use a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            retry: RetryPolicy::none(),
        }
    }

    /// Retry policy for read-only queries.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn run(&self, request: GraphqlRequest) -> Result<Cart, StorefrontError> {
        let operation = request.operation;
        let mut attempt = 0;
        loop {
            let result = match self.transport.execute(&request).await {
                Ok(response) => response.into_cart_payload(operation),
                Err(e) => Err(e),
            };
            match result {
                Ok(payload) => return payload.normalize(),
                Err(e) if !operation.is_mutation() && self.retry.should_retry(&e, attempt) => {
                    let delay = self.retry.backoff.delay_for_attempt(attempt);
                    debug!(
                        operation = operation.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying Storefront query"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn run_logged(&self, request: GraphqlRequest, context: &str) -> Option<Cart> {
        let operation = request.operation_name;
        match self.run(request).await {
            Ok(cart) => Some(cart),
            Err(e) => {
                warn!(operation, error = %e, "Error {context}");
                None
            }
        }
    }
}

#[async_trait]
impl<T: GraphqlTransport> CommerceClient for StorefrontClient<T> {
    async fn create_cart(&self) -> Option<Cart> {
        self.run_logged(GraphqlRequest::cart_create(None), "creating cart")
            .await
    }

    async fn fetch_cart(&self, cart_id: &CartId) -> Option<Cart> {
        self.run_logged(GraphqlRequest::cart(cart_id), "fetching cart")
            .await
    }

    async fn add_line_item(
        &self,
        cart_id: &CartId,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Option<Cart> {
        if quantity < 1 {
            warn!(
                variant_id = %variant_id,
                error = %StorefrontError::InvalidQuantity(quantity),
                "Error adding to cart"
            );
            return None;
        }
        self.run_logged(
            GraphqlRequest::cart_lines_add(cart_id, variant_id, quantity),
            "adding to cart",
        )
        .await
    }

    async fn update_line_item_quantity(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Option<Cart> {
        if quantity <= 0 {
            return self.remove_line_item(cart_id, line_item_id).await;
        }
        self.run_logged(
            GraphqlRequest::cart_lines_update(cart_id, line_item_id, quantity),
            "updating cart",
        )
        .await
    }

    async fn remove_line_item(&self, cart_id: &CartId, line_item_id: &LineItemId) -> Option<Cart> {
        self.run_logged(
            GraphqlRequest::cart_lines_remove(cart_id, line_item_id),
            "removing from cart",
        )
        .await
    }

    async fn create_direct_checkout(&self, variant_id: &VariantId, quantity: i64) -> Option<String> {
        if quantity < 1 {
            return None;
        }
        let cart = self
            .run_logged(
                GraphqlRequest::cart_create(Some((variant_id, quantity))),
                "creating direct checkout",
            )
            .await?;
        if cart.checkout_url.is_none() {
            warn!(cart_id = %cart.id, "Direct checkout cart has no checkout URL");
        }
        cart.checkout_url
    }
}
