//! Newtype IDs for type-safe identifiers.
//!
//! Keeps a line item id from being passed where a variant id is expected.
//! Remote ids are opaque platform strings (usually `gid://shopify/...`).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a cart (remote cart id or the local sentinel).
    CartId
);
define_id!(
    /// Identifier of one line entry within a cart.
    LineItemId
);
define_id!(
    /// Catalog identifier of a purchasable product variant.
    VariantId
);

/// Sentinel id used by carts that live only on this device.
pub const LOCAL_CART_ID: &str = "local-cart";

impl CartId {
    /// The local cart sentinel.
    pub fn local() -> Self {
        Self::new(LOCAL_CART_ID)
    }

    /// Whether this is the local cart sentinel.
    pub fn is_local(&self) -> bool {
        self.0 == LOCAL_CART_ID
    }
}

impl LineItemId {
    /// Generate a fresh id for a line created locally.
    pub fn generate_local() -> Self {
        Self(format!("local-{}", generate_id()))
    }
}

impl VariantId {
    /// The trailing numeric part of a platform id.
    ///
    /// `gid://shopify/ProductVariant/12345678` yields `12345678`; ids without
    /// a `/` are returned unchanged.
    pub fn numeric_part(&self) -> &str {
        match self.0.rsplit_once('/') {
            Some((_, tail)) => tail,
            None => &self.0,
        }
    }

    /// Whether the id is already a platform global id.
    pub fn is_gid(&self) -> bool {
        self.0.starts_with("gid://")
    }
}

/// Generate a unique ID from the clock and a process-wide counter.
fn generate_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{millis:x}{counter:04x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = VariantId::new("var-123");
        assert_eq!(id.as_str(), "var-123");
    }

    #[test]
    fn test_local_line_ids_are_unique() {
        let id1 = LineItemId::generate_local();
        let id2 = LineItemId::generate_local();
        assert_ne!(id1, id2);
        assert!(id1.as_str().starts_with("local-"));
    }

    #[test]
    fn test_local_cart_sentinel() {
        assert!(CartId::local().is_local());
        assert!(!CartId::new("gid://shopify/Cart/abc").is_local());
    }

    #[test]
    fn test_numeric_part() {
        let gid = VariantId::new("gid://shopify/ProductVariant/12345678");
        assert_eq!(gid.numeric_part(), "12345678");
        assert!(gid.is_gid());

        let plain = VariantId::new("987");
        assert_eq!(plain.numeric_part(), "987");
        assert!(!plain.is_gid());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = CartId::new("cart-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""cart-1""#);
    }
}
