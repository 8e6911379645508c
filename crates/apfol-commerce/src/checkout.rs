//! Checkout handoff.
//!
//! Payment happens on the commerce platform's hosted checkout page; this
//! side only decides where to send the customer.

use crate::ids::VariantId;
use serde::{Deserialize, Serialize};

/// Notice shown when checkout is attempted without platform credentials.
pub const CHECKOUT_UNAVAILABLE_NOTICE: &str =
    "Checkout requires Shopify to be configured. Please set up your Shopify credentials.";

/// Where checkout should go next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CheckoutHandoff {
    /// Navigate to the hosted checkout page.
    Redirect(String),
    /// Checkout cannot proceed; show the notice and block.
    Unavailable(String),
}

impl CheckoutHandoff {
    /// The standard "not configured" handoff.
    pub fn not_configured() -> Self {
        CheckoutHandoff::Unavailable(CHECKOUT_UNAVAILABLE_NOTICE.to_string())
    }

    /// The redirect URL, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            CheckoutHandoff::Redirect(url) => Some(url),
            CheckoutHandoff::Unavailable(_) => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, CheckoutHandoff::Redirect(_))
    }
}

/// Cart permalink that starts a checkout for a single variant.
///
/// `https://{domain}/cart/{numeric variant id}:{quantity}`
pub fn permalink_url(domain: &str, variant_id: &VariantId, quantity: i64) -> String {
    let domain = domain
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    format!(
        "https://{domain}/cart/{}:{quantity}",
        variant_id.numeric_part()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permalink_uses_numeric_variant_id() {
        let variant = VariantId::new("gid://shopify/ProductVariant/4242");
        assert_eq!(
            permalink_url("apfol.myshopify.com", &variant, 3),
            "https://apfol.myshopify.com/cart/4242:3"
        );
    }

    #[test]
    fn test_permalink_normalizes_domain() {
        let variant = VariantId::new("77");
        assert_eq!(
            permalink_url("https://apfol.myshopify.com/", &variant, 1),
            "https://apfol.myshopify.com/cart/77:1"
        );
    }

    #[test]
    fn test_handoff_helpers() {
        let redirect = CheckoutHandoff::Redirect("https://x/checkout".to_string());
        assert!(redirect.is_redirect());
        assert_eq!(redirect.url(), Some("https://x/checkout"));

        let blocked = CheckoutHandoff::not_configured();
        assert!(!blocked.is_redirect());
        assert_eq!(
            blocked,
            CheckoutHandoff::Unavailable(CHECKOUT_UNAVAILABLE_NOTICE.to_string())
        );
    }
}
