//! Cart pricing calculations.
//!
//! The storefront runs a cart-wide "buy 3, get the cheapest free" bundle:
//! for every full group of three units in the cart, the cheapest remaining
//! unit is free. All arithmetic is done in integer minor units.

use crate::cart::LineItem;
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Units per bundle; one unit in each full bundle is free.
pub const BUNDLE_SIZE: i64 = 3;

/// Sum of unit price × quantity over all items.
pub fn subtotal(items: &[LineItem], currency: Currency) -> Result<Money, CommerceError> {
    items.iter().try_fold(Money::zero(currency), |acc, item| {
        let line = item.line_total()?;
        acc.try_add(&line)
    })
}

/// Total number of units in the cart.
pub fn line_item_count(items: &[LineItem]) -> i64 {
    items.iter().map(|item| item.quantity).sum()
}

/// Bundle discount: the `floor(units / 3)` cheapest units are free.
///
/// Works over (price, quantity) pairs sorted by price, which gives the same
/// result as expanding every unit and sorting the whole multiset.
pub fn bundle_discount(items: &[LineItem], currency: Currency) -> Result<Money, CommerceError> {
    let mut units: Vec<(i64, i64)> = Vec::with_capacity(items.len());
    for item in items {
        let price = item.variant.unit_price;
        if price.currency != currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: currency.code().to_string(),
                got: price.currency.code().to_string(),
            });
        }
        if item.quantity > 0 {
            units.push((price.amount_cents, item.quantity));
        }
    }

    let total_units = units
        .iter()
        .try_fold(0_i64, |acc, (_, qty)| acc.checked_add(*qty))
        .ok_or(CommerceError::Overflow)?;
    let mut free = total_units / BUNDLE_SIZE;
    if free == 0 {
        return Ok(Money::zero(currency));
    }

    units.sort_by_key(|(price, _)| *price);

    let mut discount: i64 = 0;
    for (price, qty) in units {
        if free == 0 {
            break;
        }
        let take = qty.min(free);
        let amount = price.checked_mul(take).ok_or(CommerceError::Overflow)?;
        discount = discount
            .checked_add(amount)
            .ok_or(CommerceError::Overflow)?;
        free -= take;
    }

    Ok(Money::new(discount, currency))
}

/// Subtotal minus bundle discount, never below zero.
pub fn total(items: &[LineItem], currency: Currency) -> Result<Money, CommerceError> {
    Ok(CartPricing::for_items(items, currency)?.grand_total)
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartPricing {
    /// Subtotal before discounts.
    pub subtotal: Money,
    /// Total discount amount.
    pub discount_total: Money,
    /// Final total (subtotal - discounts, floored at zero).
    pub grand_total: Money,
    /// Sum of line quantities.
    pub item_count: i64,
}

impl CartPricing {
    /// Price a set of line items with the bundle rule.
    pub fn for_items(items: &[LineItem], currency: Currency) -> Result<Self, CommerceError> {
        let subtotal = subtotal(items, currency)?;
        let discount_total = bundle_discount(items, currency)?;
        let grand_total = subtotal.try_subtract(&discount_total)?.floor_zero();
        Ok(Self {
            subtotal,
            discount_total,
            grand_total,
            item_count: line_item_count(items),
        })
    }

    /// Calculate the savings from discounts.
    pub fn savings(&self) -> Money {
        self.discount_total
    }

    /// Check if any discounts are applied.
    pub fn has_discounts(&self) -> bool {
        self.discount_total.is_positive()
    }

    /// Get discount percentage of subtotal.
    pub fn discount_percentage(&self) -> f64 {
        if self.subtotal.amount_cents == 0 {
            return 0.0;
        }
        (self.discount_total.amount_cents as f64 / self.subtotal.amount_cents as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::VariantSnapshot;
    use crate::ids::{LineItemId, VariantId};
    use proptest::prelude::*;

    fn item(variant: &str, cents: i64, quantity: i64) -> LineItem {
        LineItem {
            id: LineItemId::new(format!("line-{variant}")),
            title: variant.to_string(),
            variant: VariantSnapshot {
                id: VariantId::new(variant),
                title: "Default".to_string(),
                unit_price: Money::usd(cents),
                image: None,
                product_handle: variant.to_string(),
            },
            quantity,
        }
    }

    #[test]
    fn test_three_of_one_product() {
        let items = vec![item("watchintosh", 3900, 3)];
        let pricing = CartPricing::for_items(&items, Currency::USD).unwrap();
        assert_eq!(pricing.subtotal, Money::usd(11700));
        assert_eq!(pricing.discount_total, Money::usd(3900));
        assert_eq!(pricing.grand_total, Money::usd(7800));
        assert_eq!(pricing.item_count, 3);
    }

    #[test]
    fn test_two_units_get_no_discount() {
        let items = vec![item("a", 3900, 1), item("b", 5900, 1)];
        let pricing = CartPricing::for_items(&items, Currency::USD).unwrap();
        assert_eq!(pricing.discount_total, Money::usd(0));
        assert_eq!(pricing.grand_total, Money::usd(9800));
        assert!(!pricing.has_discounts());
    }

    #[test]
    fn test_remainder_units_are_not_discounted() {
        let items = vec![item("watchintosh", 3900, 4)];
        let pricing = CartPricing::for_items(&items, Currency::USD).unwrap();
        assert_eq!(pricing.discount_total, Money::usd(3900));
        assert_eq!(pricing.grand_total, Money::usd(11700));
    }

    #[test]
    fn test_cheapest_units_are_free_across_lines() {
        // Units: 10, 20, 20, 50, 50, 50 -> two free units: 10 + 20
        let items = vec![
            item("c", 5000, 3),
            item("b", 2000, 2),
            item("a", 1000, 1),
        ];
        let discount = bundle_discount(&items, Currency::USD).unwrap();
        assert_eq!(discount, Money::usd(3000));
    }

    #[test]
    fn test_empty_cart() {
        let pricing = CartPricing::for_items(&[], Currency::USD).unwrap();
        assert!(pricing.subtotal.is_zero());
        assert!(pricing.discount_total.is_zero());
        assert!(pricing.grand_total.is_zero());
        assert_eq!(pricing.item_count, 0);
        assert_eq!(pricing.discount_percentage(), 0.0);
    }

    #[test]
    fn test_currency_mismatch_is_reported() {
        let mut eur = item("eur", 1000, 3);
        eur.variant.unit_price = Money::new(1000, Currency::EUR);
        assert!(matches!(
            bundle_discount(&[eur], Currency::USD),
            Err(CommerceError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_discount_percentage() {
        let items = vec![item("watchintosh", 3900, 3)];
        let pricing = CartPricing::for_items(&items, Currency::USD).unwrap();
        assert!((pricing.discount_percentage() - 33.33).abs() < 0.01);
        assert_eq!(pricing.savings(), Money::usd(3900));
    }

    fn expanded_discount(lines: &[(i64, i64)]) -> i64 {
        let mut all: Vec<i64> = lines
            .iter()
            .flat_map(|(price, qty)| std::iter::repeat(*price).take(*qty as usize))
            .collect();
        all.sort_unstable();
        let free = all.len() / 3;
        all.iter().take(free).sum()
    }

    proptest! {
        #[test]
        fn test_total_is_subtotal_minus_discount(
            lines in prop::collection::vec((0_i64..20_000, 1_i64..12), 0..8)
        ) {
            let items: Vec<LineItem> = lines
                .iter()
                .enumerate()
                .map(|(i, (price, qty))| item(&format!("v{i}"), *price, *qty))
                .collect();
            let pricing = CartPricing::for_items(&items, Currency::USD).unwrap();

            prop_assert!(pricing.grand_total.amount_cents >= 0);
            prop_assert_eq!(
                pricing.grand_total.amount_cents,
                pricing.subtotal.amount_cents - pricing.discount_total.amount_cents
            );
            prop_assert_eq!(pricing.discount_total.amount_cents, expanded_discount(&lines));

            let units: i64 = lines.iter().map(|(_, q)| q).sum();
            if units < 3 {
                prop_assert!(pricing.discount_total.is_zero());
            }
        }
    }
}
