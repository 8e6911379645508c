//! Product-page price previews.
//!
//! These quotes are what a product page shows next to its quantity picker.
//! They are independent of the cart-wide bundle rule in
//! [`pricing`](crate::cart::pricing) and are never reconciled with it.

use crate::error::CommerceError;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Promotion advertised on a product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuoteRule {
    /// Every `every`-th unit costs `unit_price` ("Buy 2 Get 1 Free").
    EveryNthAt { every: i64, unit_price: Money },
    /// Each complete group of `size` units costs `price` ("2 for $X").
    BundlePrice { size: i64, price: Money },
    /// List price times quantity.
    #[default]
    None,
}

/// Price preview for a quantity on a product page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub quantity: i64,
    /// What the customer pays.
    pub price: Money,
    /// Strikethrough amount.
    pub compare_at: Money,
    /// `compare_at - price`, never negative.
    pub savings: Money,
    /// Savings as a whole percentage of `compare_at`.
    pub savings_percent: i64,
    /// Whether the rule lowered the price below list.
    pub promotion_applied: bool,
}

impl QuoteRule {
    /// Quote `quantity` units at `list_price`.
    ///
    /// `compare_at_price` is the per-unit strikethrough price; without one
    /// the list price is used.
    pub fn quote(
        &self,
        list_price: Money,
        compare_at_price: Option<Money>,
        quantity: i64,
    ) -> Result<PriceQuote, CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }

        let list_total = list_price.try_multiply(quantity)?;
        let price = match *self {
            QuoteRule::EveryNthAt { every, unit_price } if every > 0 => {
                let special = quantity / every;
                let regular = quantity - special;
                list_price
                    .try_multiply(regular)?
                    .try_add(&unit_price.try_multiply(special)?)?
            }
            QuoteRule::BundlePrice { size, price } if size > 0 => {
                let groups = quantity / size;
                let rest = quantity % size;
                price
                    .try_multiply(groups)?
                    .try_add(&list_price.try_multiply(rest)?)?
            }
            _ => list_total,
        };

        let compare_at = compare_at_price
            .unwrap_or(list_price)
            .try_multiply(quantity)?;
        let savings = compare_at.try_subtract(&price)?.floor_zero();

        Ok(PriceQuote {
            quantity,
            price,
            compare_at,
            savings,
            savings_percent: rounded_percent(savings.amount_cents, compare_at.amount_cents),
            promotion_applied: price.amount_cents < list_total.amount_cents,
        })
    }

    /// Short label for the promotion, if any.
    pub fn label(&self) -> Option<String> {
        match *self {
            QuoteRule::EveryNthAt { every, unit_price } if every > 0 => {
                if unit_price.is_zero() {
                    Some(format!("Buy {} Get 1 Free", every - 1))
                } else {
                    Some(format!("Every {} unit {unit_price}", ordinal(every)))
                }
            }
            QuoteRule::BundlePrice { size, price } if size > 0 => {
                Some(format!("{size} for {price}"))
            }
            _ => None,
        }
    }
}

fn ordinal(n: i64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn rounded_percent(part: i64, whole: i64) -> i64 {
    if whole <= 0 {
        return 0;
    }
    (part.saturating_mul(100) + whole / 2) / whole
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buy_two_get_one() -> QuoteRule {
        QuoteRule::EveryNthAt {
            every: 3,
            unit_price: Money::usd(0),
        }
    }

    #[test]
    fn test_every_third_unit_free() {
        let quote = buy_two_get_one()
            .quote(Money::usd(3900), Some(Money::usd(5900)), 3)
            .unwrap();
        assert_eq!(quote.price, Money::usd(7800));
        assert_eq!(quote.compare_at, Money::usd(17700));
        assert_eq!(quote.savings, Money::usd(9900));
        assert_eq!(quote.savings_percent, 56);
        assert!(quote.promotion_applied);
    }

    #[test]
    fn test_single_unit_shows_compare_at_savings_only() {
        let quote = buy_two_get_one()
            .quote(Money::usd(3900), Some(Money::usd(5900)), 1)
            .unwrap();
        assert_eq!(quote.price, Money::usd(3900));
        assert_eq!(quote.savings, Money::usd(2000));
        assert!(!quote.promotion_applied);
    }

    #[test]
    fn test_bundle_price_with_remainder() {
        let rule = QuoteRule::BundlePrice {
            size: 2,
            price: Money::usd(7000),
        };
        let quote = rule.quote(Money::usd(4999), None, 3).unwrap();
        assert_eq!(quote.price, Money::usd(11999));
        assert_eq!(quote.compare_at, Money::usd(14997));
        assert!(quote.promotion_applied);
    }

    #[test]
    fn test_no_rule_is_list_price() {
        let quote = QuoteRule::None.quote(Money::usd(4999), None, 2).unwrap();
        assert_eq!(quote.price, Money::usd(9998));
        assert!(quote.savings.is_zero());
        assert_eq!(quote.savings_percent, 0);
        assert!(!quote.promotion_applied);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert_eq!(
            QuoteRule::None.quote(Money::usd(100), None, 0),
            Err(CommerceError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(buy_two_get_one().label().as_deref(), Some("Buy 2 Get 1 Free"));
        assert_eq!(QuoteRule::None.label(), None);

        let every = |n| QuoteRule::EveryNthAt {
            every: n,
            unit_price: Money::usd(1900),
        };
        assert_eq!(every(1).label().as_deref(), Some("Every 1st unit $19.00"));
        assert_eq!(every(2).label().as_deref(), Some("Every 2nd unit $19.00"));
        assert_eq!(every(3).label().as_deref(), Some("Every 3rd unit $19.00"));
        assert_eq!(every(4).label().as_deref(), Some("Every 4th unit $19.00"));
        assert_eq!(every(12).label().as_deref(), Some("Every 12th unit $19.00"));
        assert_eq!(every(22).label().as_deref(), Some("Every 22nd unit $19.00"));
    }
}
