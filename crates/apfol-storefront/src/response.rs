//! Storefront API response payloads and their normalization into [`Cart`].

use crate::error::GraphqlError;
use crate::request::Operation;
use crate::StorefrontError;
use apfol_commerce::cart::{Cart, LineItem, ProductImage, VariantSnapshot};
use apfol_commerce::{CartId, CommerceError, LineItemId, Money, VariantId};
use serde::Deserialize;
use serde_json::Value;

/// Top-level GraphQL response.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl GraphqlResponse {
    /// Extract the cart payload for `operation`.
    ///
    /// GraphQL errors, mutation user errors and a missing cart are all
    /// reported as errors.
    pub fn into_cart_payload(self, operation: Operation) -> Result<CartPayload, StorefrontError> {
        if !self.errors.is_empty() {
            return Err(StorefrontError::GraphQL(self.errors));
        }
        let root = self
            .data
            .and_then(|mut data| data.get_mut(operation.root_field()).map(Value::take))
            .unwrap_or(Value::Null);

        let cart = if operation.is_mutation() {
            let payload: Option<MutationPayload> = serde_json::from_value(root)?;
            let payload = payload.ok_or_else(|| {
                StorefrontError::CartNotFound(format!("{} returned no payload", operation.name()))
            })?;
            if !payload.user_errors.is_empty() {
                return Err(StorefrontError::UserErrors(
                    payload.user_errors.into_iter().map(|e| e.message).collect(),
                ));
            }
            payload.cart
        } else {
            serde_json::from_value(root)?
        };

        cart.ok_or_else(|| StorefrontError::CartNotFound(operation.name().to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationPayload {
    cart: Option<CartPayload>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
struct UserError {
    message: String,
}

/// Cart object as returned by the Storefront API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    pub id: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
    pub cost: CartCost,
    #[serde(default)]
    pub discount_allocations: Vec<DiscountAllocation>,
    pub lines: Connection<CartLine>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    pub subtotal_amount: MoneyV2,
    pub total_amount: MoneyV2,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    pub amount: String,
    pub currency_code: String,
}

impl MoneyV2 {
    fn to_money(&self) -> Result<Money, CommerceError> {
        Money::parse_with_code(&self.amount, &self.currency_code)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountAllocation {
    pub discounted_amount: MoneyV2,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub quantity: i64,
    pub merchandise: Merchandise,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Merchandise {
    pub id: String,
    pub title: String,
    pub price: MoneyV2,
    #[serde(default)]
    pub image: Option<Image>,
    pub product: ProductRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRef {
    pub title: String,
    pub handle: String,
}

impl CartPayload {
    /// Convert into the storefront's cart shape.
    ///
    /// Totals are taken as reported; the discount is the sum of cart-level
    /// allocations and the unit count is recomputed from the lines.
    pub fn normalize(self) -> Result<Cart, StorefrontError> {
        let subtotal_price = self.cost.subtotal_amount.to_money()?;
        let total_price = self.cost.total_amount.to_money()?;
        let currency = subtotal_price.currency;

        let mut discount_amount = Money::zero(currency);
        for allocation in &self.discount_allocations {
            discount_amount = discount_amount.try_add(&allocation.discounted_amount.to_money()?)?;
        }

        let line_items = self
            .lines
            .edges
            .into_iter()
            .map(|edge| edge.node.into_line_item())
            .collect::<Result<Vec<_>, _>>()?;
        let line_item_count = line_items.iter().map(|item| item.quantity).sum();

        Ok(Cart {
            id: CartId::new(self.id),
            line_items,
            subtotal_price,
            discount_amount,
            total_price,
            line_item_count,
            checkout_url: self.checkout_url,
        })
    }
}

impl CartLine {
    fn into_line_item(self) -> Result<LineItem, CommerceError> {
        let merchandise = self.merchandise;
        Ok(LineItem {
            id: LineItemId::new(self.id),
            title: merchandise.product.title,
            variant: VariantSnapshot {
                id: VariantId::new(merchandise.id),
                title: merchandise.title,
                unit_price: merchandise.price.to_money()?,
                image: merchandise.image.map(|image| ProductImage {
                    src: image.url,
                    alt_text: image.alt_text,
                }),
                product_handle: merchandise.product.handle,
            },
            quantity: self.quantity,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use apfol_commerce::Currency;
    use serde_json::json;

    fn response(body: Value) -> GraphqlResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_normalize_query_payload() {
        let body = json!({ "data": { "cart": cart_json("gid://shopify/Cart/1", 2) } });
        let cart = response(body)
            .into_cart_payload(Operation::Cart)
            .unwrap()
            .normalize()
            .unwrap();

        assert_eq!(cart.id.as_str(), "gid://shopify/Cart/1");
        assert_eq!(cart.line_item_count, 2);
        assert_eq!(cart.subtotal_price, Money::usd(7800));
        assert_eq!(cart.discount_amount, Money::usd(0));
        let line = &cart.line_items[0];
        assert_eq!(line.title, "Watchintosh");
        assert_eq!(line.variant.unit_price, Money::usd(3900));
        assert_eq!(line.variant.product_handle, "watchintosh");
        assert_eq!(
            line.variant.image.as_ref().map(|i| i.src.as_str()),
            Some("https://cdn.shopify.com/w.png")
        );
        assert!(cart.checkout_url.is_some());
    }

    #[test]
    fn test_discount_allocations_are_summed() {
        let mut payload = cart_json("c", 3);
        payload["discountAllocations"] = json!([
            { "discountedAmount": { "amount": "30.00", "currencyCode": "USD" } },
            { "discountedAmount": { "amount": "9.00", "currencyCode": "USD" } }
        ]);
        let cart = response(json!({ "data": { "cart": payload } }))
            .into_cart_payload(Operation::Cart)
            .unwrap()
            .normalize()
            .unwrap();
        assert_eq!(cart.discount_amount, Money::usd(3900));
    }

    #[test]
    fn test_missing_cart_is_not_found() {
        let result = response(json!({ "data": { "cart": null } })).into_cart_payload(Operation::Cart);
        assert!(matches!(result, Err(StorefrontError::CartNotFound(_))));
    }

    #[test]
    fn test_graphql_errors() {
        let body = json!({ "errors": [{ "message": "Throttled" }] });
        let result = response(body).into_cart_payload(Operation::Cart);
        assert!(matches!(result, Err(StorefrontError::GraphQL(ref e)) if e[0].message == "Throttled"));
    }

    #[test]
    fn test_mutation_user_errors() {
        let body = json!({ "data": { "cartLinesAdd": {
            "cart": null,
            "userErrors": [{ "field": ["lines"], "message": "Variant not found" }]
        }}});
        let result = response(body).into_cart_payload(Operation::CartLinesAdd);
        assert!(matches!(result, Err(StorefrontError::UserErrors(ref m)) if m[0] == "Variant not found"));
    }

    #[test]
    fn test_mutation_payload() {
        let body = json!({ "data": { "cartCreate": {
            "cart": empty_cart_json("gid://shopify/Cart/new"),
            "userErrors": []
        }}});
        let cart = response(body)
            .into_cart_payload(Operation::CartCreate)
            .unwrap()
            .normalize()
            .unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price.display_amount(), "0.00");
    }

    #[test]
    fn test_malformed_currency_is_an_error() {
        let mut payload = cart_json("c", 1);
        payload["cost"]["subtotalAmount"]["currencyCode"] = json!("US$");
        let result = response(json!({ "data": { "cart": payload } }))
            .into_cart_payload(Operation::Cart)
            .unwrap()
            .normalize();
        assert!(matches!(result, Err(StorefrontError::Money(_))));
    }

    #[test]
    fn test_store_currency_outside_named_list() {
        let text = cart_json("gid://shopify/Cart/9", 2)
            .to_string()
            .replace("\"USD\"", "\"SEK\"");
        let payload: Value = serde_json::from_str(&text).unwrap();
        let cart = response(json!({ "data": { "cart": payload } }))
            .into_cart_payload(Operation::Cart)
            .unwrap()
            .normalize()
            .unwrap();

        let sek = Currency::from_code("SEK").unwrap();
        assert_eq!(cart.subtotal_price, Money::new(7800, sek));
        assert_eq!(cart.total_price, Money::new(7800, sek));
        assert_eq!(cart.discount_amount, Money::zero(sek));
        assert_eq!(cart.line_items[0].variant.unit_price, Money::new(3900, sek));
        assert_eq!(cart.total_price.display_amount(), "78.00");
    }
}
