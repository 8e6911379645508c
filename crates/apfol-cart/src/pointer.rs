//! Persisted identifier of the remote cart.

use apfol_cache::{Cache, CacheError};
use apfol_commerce::CartId;
use tracing::warn;

/// Storage key of the remote cart id.
pub const CHECKOUT_POINTER_KEY: &str = "apfol_checkout_id";

/// Remembers which remote cart belongs to this device.
#[derive(Debug, Clone)]
pub struct CheckoutPointer {
    cache: Cache,
}

impl CheckoutPointer {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// The stored cart id, if any. Unreadable or blank values count as absent.
    pub fn load(&self) -> Option<CartId> {
        match self.cache.get::<CartId>(CHECKOUT_POINTER_KEY) {
            Ok(id) => id.filter(|id| !id.as_str().trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable checkout pointer");
                None
            }
        }
    }

    pub fn store(&self, cart_id: &CartId) -> Result<(), CacheError> {
        self.cache.set(CHECKOUT_POINTER_KEY, cart_id)
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        self.cache.delete(CHECKOUT_POINTER_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_load_clear() {
        let pointer = CheckoutPointer::new(Cache::in_memory());
        assert_eq!(pointer.load(), None);

        let id = CartId::new("gid://shopify/Cart/abc");
        pointer.store(&id).unwrap();
        assert_eq!(pointer.load(), Some(id));

        pointer.clear().unwrap();
        assert_eq!(pointer.load(), None);
    }

    #[test]
    fn test_invalid_values_are_absent() {
        let cache = Cache::in_memory();
        let pointer = CheckoutPointer::new(cache.clone());

        cache.set(CHECKOUT_POINTER_KEY, &42).unwrap();
        assert_eq!(pointer.load(), None);

        cache.set(CHECKOUT_POINTER_KEY, "").unwrap();
        assert_eq!(pointer.load(), None);
    }
}
