//! Device-local cart persistence.

use apfol_cache::{Cache, CacheError};
use apfol_commerce::Cart;
use tracing::{debug, warn};

/// Storage key of the local cart snapshot.
pub const LOCAL_CART_KEY: &str = "apfol_local_cart";

/// Persists the whole local cart as one snapshot.
#[derive(Debug, Clone)]
pub struct LocalCartStore {
    cache: Cache,
}

impl LocalCartStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// The stored cart, or an empty local cart when none is stored or the
    /// snapshot cannot be read.
    ///
    /// A snapshot that parses but breaks the line rules is discarded too.
    /// Totals are always recomputed from the lines.
    pub fn load(&self) -> Cart {
        let mut cart = match self.cache.get::<Cart>(LOCAL_CART_KEY) {
            Ok(Some(cart)) => cart,
            Ok(None) => return Cart::empty_local(),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable local cart");
                return Cart::empty_local();
            }
        };

        if let Err(e) = cart.check_lines().and_then(|()| cart.reprice()) {
            warn!(error = %e, "Discarding invalid local cart");
            return Cart::empty_local();
        }
        debug!(items = cart.line_item_count, "Loaded local cart");
        cart
    }

    /// Overwrite the stored snapshot.
    pub fn save(&self, cart: &Cart) -> Result<(), CacheError> {
        self.cache.set(LOCAL_CART_KEY, cart)
    }

    /// Remove the stored snapshot.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.cache.delete(LOCAL_CART_KEY)
    }
}
