//! Backing store for a cart session, chosen once at initialization.

use crate::local::LocalCartStore;
use crate::outcome::CartFailure;
use apfol_commerce::catalog::Catalog;
use apfol_commerce::{Cart, CommerceError, LineItemId, VariantId};
use apfol_storefront::CommerceClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Which backend a session is using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartMode {
    /// Cart lives on the commerce platform.
    Remote,
    /// Cart lives only on this device.
    Local,
}

impl fmt::Display for CartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartMode::Remote => f.write_str("remote"),
            CartMode::Local => f.write_str("local"),
        }
    }
}

/// The operation set shared by remote and local carts.
///
/// Each operation takes the current cart and returns its replacement; the
/// caller keeps the current cart on error.
pub enum CartBackend {
    Remote(Arc<dyn CommerceClient>),
    Local {
        store: LocalCartStore,
        catalog: Catalog,
    },
}

impl fmt::Debug for CartBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartBackend::Remote(_) => f.write_str("CartBackend::Remote"),
            CartBackend::Local { .. } => f.write_str("CartBackend::Local"),
        }
    }
}

impl CartBackend {
    pub fn mode(&self) -> CartMode {
        match self {
            CartBackend::Remote(_) => CartMode::Remote,
            CartBackend::Local { .. } => CartMode::Local,
        }
    }

    pub async fn add(
        &self,
        cart: &Cart,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<Cart, CartFailure> {
        match self {
            CartBackend::Remote(client) => client
                .add_line_item(&cart.id, variant_id, quantity)
                .await
                .ok_or_else(|| CartFailure::RemoteRejected("add_line_item".to_string())),
            CartBackend::Local { store, catalog } => {
                let product = catalog
                    .resolve(variant_id)
                    .ok_or_else(|| CommerceError::ProductNotFound(variant_id.to_string()))?;
                let mut next = cart.clone();
                next.add_line(&product.title, product.snapshot(variant_id), quantity)?;
                persist(store, &next);
                Ok(next)
            }
        }
    }

    pub async fn update(
        &self,
        cart: &Cart,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Result<Cart, CartFailure> {
        if quantity <= 0 {
            return self.remove(cart, line_item_id).await;
        }
        match self {
            CartBackend::Remote(client) => {
                ensure_line(cart, line_item_id)?;
                client
                    .update_line_item_quantity(&cart.id, line_item_id, quantity)
                    .await
                    .ok_or_else(|| {
                        CartFailure::RemoteRejected("update_line_item_quantity".to_string())
                    })
            }
            CartBackend::Local { store, .. } => {
                let mut next = cart.clone();
                next.set_quantity(line_item_id, quantity)?;
                persist(store, &next);
                Ok(next)
            }
        }
    }

    pub async fn remove(&self, cart: &Cart, line_item_id: &LineItemId) -> Result<Cart, CartFailure> {
        match self {
            CartBackend::Remote(client) => {
                ensure_line(cart, line_item_id)?;
                client
                    .remove_line_item(&cart.id, line_item_id)
                    .await
                    .ok_or_else(|| CartFailure::RemoteRejected("remove_line_item".to_string()))
            }
            CartBackend::Local { store, .. } => {
                let mut next = cart.clone();
                next.remove_line(line_item_id)?;
                persist(store, &next);
                Ok(next)
            }
        }
    }

    /// Empty a local cart in one step. Remote carts are cleared line by
    /// line through [`CartBackend::remove`].
    pub fn clear_local(&self, cart: &Cart) -> Option<Cart> {
        match self {
            CartBackend::Remote(_) => None,
            CartBackend::Local { store, .. } => {
                let mut next = cart.clone();
                next.clear();
                if let Err(e) = store.clear() {
                    warn!(error = %e, "Failed to clear local cart");
                }
                Some(next)
            }
        }
    }
}

fn ensure_line(cart: &Cart, line_item_id: &LineItemId) -> Result<(), CartFailure> {
    if cart.get_item(line_item_id).is_none() {
        return Err(CartFailure::UnknownLineItem(line_item_id.clone()));
    }
    Ok(())
}

/// The in-memory cart is authoritative for the session; a failed write is
/// logged and the mutation still counts.
fn persist(store: &LocalCartStore, cart: &Cart) {
    if let Err(e) = store.save(cart) {
        warn!(error = %e, "Failed to save local cart");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apfol_cache::Cache;
    use apfol_commerce::catalog::VariantIds;
    use apfol_commerce::Money;

    fn local_backend(cache: &Cache) -> CartBackend {
        CartBackend::Local {
            store: LocalCartStore::new(cache.clone()),
            catalog: Catalog::builtin(&VariantIds::default()),
        }
    }

    #[tokio::test]
    async fn test_local_add_uses_catalog_and_persists() {
        let cache = Cache::in_memory();
        let backend = local_backend(&cache);

        let cart = backend
            .add(&Cart::empty_local(), &VariantId::new("watchtrainer"), 1)
            .await
            .unwrap();
        assert_eq!(cart.line_items[0].title, "WatchTrainer");
        assert_eq!(cart.total_price, Money::usd(4999));
        assert!(cart.line_items[0].id.as_str().starts_with("local-"));
        assert_eq!(LocalCartStore::new(cache).load(), cart);
    }

    #[tokio::test]
    async fn test_local_unknown_variant_priced_as_default_product() {
        let backend = local_backend(&Cache::in_memory());
        let cart = backend
            .add(&Cart::empty_local(), &VariantId::new("mystery-variant"), 1)
            .await
            .unwrap();
        assert_eq!(cart.line_items[0].title, "Watchintosh");
        assert_eq!(cart.line_items[0].variant.id.as_str(), "mystery-variant");
        assert_eq!(cart.subtotal_price, Money::usd(3900));
    }

    #[tokio::test]
    async fn test_local_update_non_positive_removes() {
        let backend = local_backend(&Cache::in_memory());
        let cart = backend
            .add(&Cart::empty_local(), &VariantId::new("watchintosh"), 2)
            .await
            .unwrap();
        let line = cart.line_items[0].id.clone();

        let zero = backend.update(&cart, &line, 0).await.unwrap();
        let negative = backend.update(&cart, &line, -1).await.unwrap();
        assert_eq!(zero, negative);
        assert!(zero.is_empty());
    }

    #[tokio::test]
    async fn test_local_unknown_line() {
        let backend = local_backend(&Cache::in_memory());
        let result = backend
            .remove(&Cart::empty_local(), &LineItemId::new("nope"))
            .await;
        assert_eq!(
            result,
            Err(CartFailure::UnknownLineItem(LineItemId::new("nope")))
        );
    }

    #[tokio::test]
    async fn test_local_clear() {
        let cache = Cache::in_memory();
        let backend = local_backend(&cache);
        let cart = backend
            .add(&Cart::empty_local(), &VariantId::new("watchintosh"), 3)
            .await
            .unwrap();

        assert!(cache.exists(crate::LOCAL_CART_KEY).unwrap());

        let cleared = backend.clear_local(&cart).unwrap();
        assert!(cleared.is_empty());
        assert!(!cache.exists(crate::LOCAL_CART_KEY).unwrap());
        assert!(LocalCartStore::new(cache).load().is_empty());
        assert_eq!(backend.mode(), CartMode::Local);
    }
}
