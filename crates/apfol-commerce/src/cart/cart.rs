//! Cart and line item types.

use crate::cart::CartPricing;
use crate::error::CommerceError;
use crate::ids::{CartId, LineItemId, VariantId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A shopping cart with its derived totals.
///
/// Local carts compute totals with the bundle rule via [`Cart::reprice`];
/// remote carts carry whatever totals the commerce platform reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Remote cart id, or the local sentinel.
    pub id: CartId,
    /// Items in the cart, one per variant.
    pub line_items: Vec<LineItem>,
    /// Sum of unit price × quantity.
    pub subtotal_price: Money,
    /// Discount applied to the subtotal.
    pub discount_amount: Money,
    /// Amount due, never negative.
    pub total_price: Money,
    /// Sum of line quantities.
    pub line_item_count: i64,
    /// Hosted checkout page, remote carts only.
    #[serde(default)]
    pub checkout_url: Option<String>,
}

impl Cart {
    /// Create an empty cart.
    pub fn empty(id: CartId, currency: Currency) -> Self {
        Self {
            id,
            line_items: Vec::new(),
            subtotal_price: Money::zero(currency),
            discount_amount: Money::zero(currency),
            total_price: Money::zero(currency),
            line_item_count: 0,
            checkout_url: None,
        }
    }

    /// Create the empty device-local cart.
    pub fn empty_local() -> Self {
        Self::empty(CartId::local(), Currency::USD)
    }

    /// Whether this cart lives only on this device.
    pub fn is_local(&self) -> bool {
        self.id.is_local()
    }

    /// Currency of the cart totals.
    pub fn currency(&self) -> Currency {
        self.subtotal_price.currency
    }

    /// Add units of a variant.
    ///
    /// An existing line for the same variant has its quantity increased;
    /// otherwise a new line with a fresh local id is appended. Returns the
    /// id of the affected line. The cart is unchanged on error.
    pub fn add_line(
        &mut self,
        title: impl Into<String>,
        variant: VariantSnapshot,
        quantity: i64,
    ) -> Result<LineItemId, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        let mut items = self.line_items.clone();
        let id = if let Some(existing) = items.iter_mut().find(|i| i.variant.id == variant.id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            check_limit(new_quantity)?;
            existing.quantity = new_quantity;
            existing.id.clone()
        } else {
            check_limit(quantity)?;
            let item = LineItem {
                id: LineItemId::generate_local(),
                title: title.into(),
                variant,
                quantity,
            };
            let id = item.id.clone();
            items.push(item);
            id
        };

        self.commit(items)?;
        Ok(id)
    }

    /// Set the quantity of a line. Zero or negative removes it.
    pub fn set_quantity(
        &mut self,
        line_item_id: &LineItemId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if quantity <= 0 {
            return self.remove_line(line_item_id);
        }
        check_limit(quantity)?;

        let mut items = self.line_items.clone();
        let item = items
            .iter_mut()
            .find(|i| &i.id == line_item_id)
            .ok_or_else(|| CommerceError::ItemNotInCart(line_item_id.to_string()))?;
        item.quantity = quantity;
        self.commit(items)
    }

    /// Remove a line.
    pub fn remove_line(&mut self, line_item_id: &LineItemId) -> Result<(), CommerceError> {
        if !self.line_items.iter().any(|i| &i.id == line_item_id) {
            return Err(CommerceError::ItemNotInCart(line_item_id.to_string()));
        }
        let items = self
            .line_items
            .iter()
            .filter(|i| &i.id != line_item_id)
            .cloned()
            .collect();
        self.commit(items)
    }

    /// Remove every line and zero the totals.
    pub fn clear(&mut self) {
        let currency = self.currency();
        self.line_items.clear();
        self.subtotal_price = Money::zero(currency);
        self.discount_amount = Money::zero(currency);
        self.total_price = Money::zero(currency);
        self.line_item_count = 0;
    }

    /// Recompute totals from the line items with the bundle rule.
    pub fn reprice(&mut self) -> Result<(), CommerceError> {
        let pricing = CartPricing::for_items(&self.line_items, self.currency())?;
        self.apply_pricing(&pricing);
        Ok(())
    }

    /// Check the line rules a stored snapshot may have broken: every
    /// quantity in `1..=MAX_QUANTITY_PER_ITEM`, and one line per variant and
    /// per line id.
    pub fn check_lines(&self) -> Result<(), CommerceError> {
        let mut variants = HashSet::new();
        let mut ids = HashSet::new();
        for item in &self.line_items {
            if item.quantity < 1 {
                return Err(CommerceError::InvalidQuantity(item.quantity));
            }
            check_limit(item.quantity)?;
            if !variants.insert(&item.variant.id) {
                return Err(CommerceError::DuplicateLine(item.variant.id.to_string()));
            }
            if !ids.insert(&item.id) {
                return Err(CommerceError::DuplicateLine(item.id.to_string()));
            }
        }
        Ok(())
    }

    /// Current totals as a pricing breakdown.
    pub fn pricing(&self) -> CartPricing {
        CartPricing {
            subtotal: self.subtotal_price,
            discount_total: self.discount_amount,
            grand_total: self.total_price,
            item_count: self.line_item_count,
        }
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Get an item by ID.
    pub fn get_item(&self, line_item_id: &LineItemId) -> Option<&LineItem> {
        self.line_items.iter().find(|i| &i.id == line_item_id)
    }

    /// Get an item by variant ID.
    pub fn get_item_by_variant(&self, variant_id: &VariantId) -> Option<&LineItem> {
        self.line_items.iter().find(|i| &i.variant.id == variant_id)
    }

    fn commit(&mut self, items: Vec<LineItem>) -> Result<(), CommerceError> {
        let pricing = CartPricing::for_items(&items, self.currency())?;
        self.line_items = items;
        self.apply_pricing(&pricing);
        Ok(())
    }

    fn apply_pricing(&mut self, pricing: &CartPricing) {
        self.subtotal_price = pricing.subtotal;
        self.discount_amount = pricing.discount_total;
        self.total_price = pricing.grand_total;
        self.line_item_count = pricing.item_count;
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty_local()
    }
}

fn check_limit(quantity: i64) -> Result<(), CommerceError> {
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Line item identifier.
    pub id: LineItemId,
    /// Product title (denormalized for display).
    pub title: String,
    /// Variant being purchased.
    pub variant: VariantSnapshot,
    /// Quantity, at least 1.
    pub quantity: i64,
}

impl LineItem {
    /// Unit price × quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.variant.unit_price.try_multiply(self.quantity)
    }
}

/// Snapshot of the variant a line refers to, taken when it was added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantSnapshot {
    pub id: VariantId,
    /// Variant title (e.g., "Default").
    pub title: String,
    pub unit_price: Money,
    #[serde(default)]
    pub image: Option<ProductImage>,
    /// Handle of the owning product.
    pub product_handle: String,
}

/// A product image reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductImage {
    pub src: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(variant: &str, cents: i64) -> VariantSnapshot {
        VariantSnapshot {
            id: VariantId::new(variant),
            title: "Default".to_string(),
            unit_price: Money::usd(cents),
            image: None,
            product_handle: variant.to_string(),
        }
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::empty_local();
        assert!(cart.is_empty());
        assert!(cart.is_local());
        assert_eq!(cart.total_price, Money::usd(0));
        assert_eq!(cart.checkout_url, None);
    }

    #[test]
    fn test_add_same_variant_increases_quantity() {
        let mut cart = Cart::empty_local();
        let first = cart
            .add_line("Watchintosh", snapshot("watchintosh", 3900), 1)
            .unwrap();
        let second = cart
            .add_line("Watchintosh", snapshot("watchintosh", 3900), 2)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(cart.line_items.len(), 1);
        assert_eq!(cart.line_item_count, 3);
        assert_eq!(cart.subtotal_price, Money::usd(11700));
        assert_eq!(cart.discount_amount, Money::usd(3900));
        assert_eq!(cart.total_price, Money::usd(7800));
    }

    #[test]
    fn test_two_products_no_discount() {
        let mut cart = Cart::empty_local();
        cart.add_line("A", snapshot("a", 3900), 1).unwrap();
        cart.add_line("B", snapshot("b", 5900), 1).unwrap();
        assert_eq!(cart.discount_amount, Money::usd(0));
        assert_eq!(cart.total_price, Money::usd(9800));
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::empty_local();
        let id = cart.add_line("A", snapshot("a", 3900), 1).unwrap();
        cart.set_quantity(&id, 4).unwrap();
        assert_eq!(cart.line_item_count, 4);
        assert_eq!(cart.total_price, Money::usd(11700));
    }

    #[test]
    fn test_zero_and_negative_quantity_both_remove() {
        let mut zero = Cart::empty_local();
        let id = zero.add_line("A", snapshot("a", 3900), 2).unwrap();
        let mut negative = zero.clone();

        zero.set_quantity(&id, 0).unwrap();
        negative.set_quantity(&id, -1).unwrap();

        assert_eq!(zero, negative);
        assert!(zero.is_empty());
    }

    #[test]
    fn test_removing_last_line_zeroes_totals() {
        let mut cart = Cart::empty_local();
        let id = cart.add_line("A", snapshot("a", 3900), 3).unwrap();
        cart.remove_line(&id).unwrap();

        assert_eq!(cart.line_item_count, 0);
        assert_eq!(cart.subtotal_price.display_amount(), "0.00");
        assert_eq!(cart.discount_amount.display_amount(), "0.00");
    }

    #[test]
    fn test_unknown_line_is_an_error_and_leaves_cart_unchanged() {
        let mut cart = Cart::empty_local();
        cart.add_line("A", snapshot("a", 3900), 1).unwrap();
        let before = cart.clone();

        let missing = LineItemId::new("nope");
        assert!(matches!(
            cart.set_quantity(&missing, 2),
            Err(CommerceError::ItemNotInCart(_))
        ));
        assert!(matches!(
            cart.remove_line(&missing),
            Err(CommerceError::ItemNotInCart(_))
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::empty_local();
        let result = cart.add_line("A", snapshot("a", 100), MAX_QUANTITY_PER_ITEM + 1);
        assert!(matches!(
            result,
            Err(CommerceError::QuantityExceedsLimit(_, MAX_QUANTITY_PER_ITEM))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_invalid_quantity() {
        let mut cart = Cart::empty_local();
        assert_eq!(
            cart.add_line("A", snapshot("a", 100), 0),
            Err(CommerceError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_check_lines() {
        let mut cart = Cart::empty_local();
        cart.add_line("A", snapshot("a", 3900), 2).unwrap();
        cart.add_line("B", snapshot("b", 5900), 1).unwrap();
        assert_eq!(cart.check_lines(), Ok(()));

        let mut zero = cart.clone();
        zero.line_items[0].quantity = 0;
        assert_eq!(zero.check_lines(), Err(CommerceError::InvalidQuantity(0)));

        let mut huge = cart.clone();
        huge.line_items[1].quantity = MAX_QUANTITY_PER_ITEM + 1;
        assert!(matches!(
            huge.check_lines(),
            Err(CommerceError::QuantityExceedsLimit(..))
        ));

        let mut same_variant = cart.clone();
        same_variant.line_items[1].variant.id = VariantId::new("a");
        assert!(matches!(
            same_variant.check_lines(),
            Err(CommerceError::DuplicateLine(_))
        ));

        let mut same_id = cart;
        same_id.line_items[1].id = same_id.line_items[0].id.clone();
        assert!(matches!(
            same_id.check_lines(),
            Err(CommerceError::DuplicateLine(_))
        ));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::empty_local();
        cart.add_line("A", snapshot("a", 3900), 5).unwrap();
        cart.clear();
        assert_eq!(cart, Cart::empty_local());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut cart = Cart::empty_local();
        cart.add_line("A", snapshot("a", 3900), 2).unwrap();
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
