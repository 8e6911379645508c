//! GraphQL request documents for the Storefront Cart API.

use apfol_commerce::{CartId, LineItemId, VariantId};
use serde::Serialize;
use serde_json::{json, Value};

const CART_FIELDS: &str = r#"
fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  cost {
    subtotalAmount { amount currencyCode }
    totalAmount { amount currencyCode }
  }
  discountAllocations {
    discountedAmount { amount currencyCode }
  }
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        merchandise {
          ... on ProductVariant {
            id
            title
            price { amount currencyCode }
            image { url altText }
            product { title handle }
          }
        }
      }
    }
  }
}
"#;

const CART_QUERY: &str = r#"
query Cart($id: ID!) {
  cart(id: $id) { ...CartFields }
}
"#;

const CART_CREATE: &str = r#"
mutation CartCreate($input: CartInput) {
  cartCreate(input: $input) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
"#;

const CART_LINES_ADD: &str = r#"
mutation CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
"#;

const CART_LINES_UPDATE: &str = r#"
mutation CartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
"#;

const CART_LINES_REMOVE: &str = r#"
mutation CartLinesRemove($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart { ...CartFields }
    userErrors { field message }
  }
}
"#;

/// Cart API operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Cart,
    CartCreate,
    CartLinesAdd,
    CartLinesUpdate,
    CartLinesRemove,
}

impl Operation {
    /// GraphQL operation name.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Cart => "Cart",
            Operation::CartCreate => "CartCreate",
            Operation::CartLinesAdd => "CartLinesAdd",
            Operation::CartLinesUpdate => "CartLinesUpdate",
            Operation::CartLinesRemove => "CartLinesRemove",
        }
    }

    /// Field under `data` holding the result.
    pub fn root_field(&self) -> &'static str {
        match self {
            Operation::Cart => "cart",
            Operation::CartCreate => "cartCreate",
            Operation::CartLinesAdd => "cartLinesAdd",
            Operation::CartLinesUpdate => "cartLinesUpdate",
            Operation::CartLinesRemove => "cartLinesRemove",
        }
    }

    /// Whether the operation changes remote state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Operation::Cart)
    }

    fn document(&self) -> &'static str {
        match self {
            Operation::Cart => CART_QUERY,
            Operation::CartCreate => CART_CREATE,
            Operation::CartLinesAdd => CART_LINES_ADD,
            Operation::CartLinesUpdate => CART_LINES_UPDATE,
            Operation::CartLinesRemove => CART_LINES_REMOVE,
        }
    }
}

/// A GraphQL request body.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
    #[serde(rename = "operationName")]
    pub operation_name: &'static str,
    #[serde(skip)]
    pub operation: Operation,
}

impl GraphqlRequest {
    /// Build a request for `operation` with the cart fragment appended.
    pub fn new(operation: Operation, variables: Value) -> Self {
        Self {
            query: format!("{}{}", operation.document(), CART_FIELDS),
            variables,
            operation_name: operation.name(),
            operation,
        }
    }

    /// Fetch a cart by id.
    pub fn cart(cart_id: &CartId) -> Self {
        Self::new(Operation::Cart, json!({ "id": cart_id }))
    }

    /// Create an empty cart, or one holding a single line.
    pub fn cart_create(line: Option<(&VariantId, i64)>) -> Self {
        let input = match line {
            Some((variant_id, quantity)) => json!({
                "lines": [{ "merchandiseId": variant_gid(variant_id), "quantity": quantity }]
            }),
            None => json!({}),
        };
        Self::new(Operation::CartCreate, json!({ "input": input }))
    }

    /// Add units of a variant.
    pub fn cart_lines_add(cart_id: &CartId, variant_id: &VariantId, quantity: i64) -> Self {
        Self::new(
            Operation::CartLinesAdd,
            json!({
                "cartId": cart_id,
                "lines": [{ "merchandiseId": variant_gid(variant_id), "quantity": quantity }],
            }),
        )
    }

    /// Set the quantity of a line.
    pub fn cart_lines_update(cart_id: &CartId, line_id: &LineItemId, quantity: i64) -> Self {
        Self::new(
            Operation::CartLinesUpdate,
            json!({
                "cartId": cart_id,
                "lines": [{ "id": line_id, "quantity": quantity }],
            }),
        )
    }

    /// Remove a line.
    pub fn cart_lines_remove(cart_id: &CartId, line_id: &LineItemId) -> Self {
        Self::new(
            Operation::CartLinesRemove,
            json!({ "cartId": cart_id, "lineIds": [line_id] }),
        )
    }
}

/// Platform global id for a variant; plain numeric ids are expanded.
pub fn variant_gid(variant_id: &VariantId) -> String {
    if variant_id.is_gid() {
        variant_id.to_string()
    } else {
        format!("gid://shopify/ProductVariant/{}", variant_id.as_str())
    }
}
