//! Product catalog for the storefront.
//!
//! Local-mode carts have no remote platform to describe a variant, so the
//! title, price and image snapshot for a line come from here.

use crate::cart::{PriceQuote, ProductImage, QuoteRule, VariantSnapshot};
use crate::error::CommerceError;
use crate::ids::VariantId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Handle of the Watchintosh dock.
pub const WATCHINTOSH_HANDLE: &str = "watchintosh";
/// Handle of the WatchTrainer charger.
pub const WATCHTRAINER_HANDLE: &str = "watchtrainer";

/// A sellable product with a single default variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// URL handle of the product page.
    pub handle: String,
    /// Display title.
    pub title: String,
    /// Variant id used when adding this product to a cart.
    pub variant_id: VariantId,
    /// Variant title.
    pub variant_title: String,
    /// Unit price.
    pub unit_price: Money,
    /// Strikethrough price shown on the product page.
    pub compare_at_price: Option<Money>,
    /// Primary image.
    pub image: Option<ProductImage>,
    /// Promotion previewed on the product page.
    pub quote_rule: QuoteRule,
}

impl Product {
    /// Build the variant snapshot stored on a cart line.
    pub fn snapshot(&self, variant_id: &VariantId) -> VariantSnapshot {
        VariantSnapshot {
            id: variant_id.clone(),
            title: self.variant_title.clone(),
            unit_price: self.unit_price,
            image: self.image.clone(),
            product_handle: self.handle.clone(),
        }
    }

    /// Product-page price preview for `quantity` units.
    pub fn quote(&self, quantity: i64) -> Result<PriceQuote, CommerceError> {
        self.quote_rule
            .quote(self.unit_price, self.compare_at_price, quantity)
    }

    /// Placeholder variant id used when none is configured.
    pub fn demo_variant_id(handle: &str) -> VariantId {
        VariantId::new(format!("demo-variant-{handle}"))
    }
}

/// Configured variant ids for the built-in products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantIds {
    pub watchintosh: Option<VariantId>,
    pub watchtrainer: Option<VariantId>,
}

/// The storefront catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog. The first product is the fallback for unknown variants.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The two products sold by the storefront.
    pub fn builtin(ids: &VariantIds) -> Self {
        let watchintosh = Product {
            handle: WATCHINTOSH_HANDLE.to_string(),
            title: "Watchintosh".to_string(),
            variant_id: ids
                .watchintosh
                .clone()
                .unwrap_or_else(|| Product::demo_variant_id(WATCHINTOSH_HANDLE)),
            variant_title: "Default".to_string(),
            unit_price: Money::usd(3900),
            compare_at_price: Some(Money::usd(5900)),
            image: Some(ProductImage {
                src: "/watchintosh.png".to_string(),
                alt_text: Some("Watchintosh".to_string()),
            }),
            quote_rule: QuoteRule::EveryNthAt {
                every: 3,
                unit_price: Money::usd(0),
            },
        };

        let watchtrainer = Product {
            handle: WATCHTRAINER_HANDLE.to_string(),
            title: "WatchTrainer".to_string(),
            variant_id: ids
                .watchtrainer
                .clone()
                .unwrap_or_else(|| Product::demo_variant_id(WATCHTRAINER_HANDLE)),
            variant_title: "Default".to_string(),
            unit_price: Money::usd(4999),
            compare_at_price: Some(Money::usd(6999)),
            image: Some(ProductImage {
                src: "/watchtrainer.png".to_string(),
                alt_text: Some("WatchTrainer".to_string()),
            }),
            quote_rule: QuoteRule::None,
        };

        Self::new(vec![watchintosh, watchtrainer])
    }

    /// All products.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by handle.
    pub fn by_handle(&self, handle: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.handle == handle)
    }

    /// Look up a product by variant id.
    ///
    /// Matches the configured variant id, the handle itself, or the
    /// `demo-variant-{handle}` placeholder.
    pub fn by_variant(&self, variant_id: &VariantId) -> Option<&Product> {
        self.products.iter().find(|p| {
            &p.variant_id == variant_id
                || p.handle == variant_id.as_str()
                || Product::demo_variant_id(&p.handle) == *variant_id
        })
    }

    /// Resolve a variant, falling back to the first product for unknown ids.
    pub fn resolve(&self, variant_id: &VariantId) -> Option<&Product> {
        self.by_variant(variant_id).or_else(|| self.products.first())
    }
}
