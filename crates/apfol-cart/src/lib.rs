//! Cart state for the Apfol storefront.
//!
//! [`CartStore`] owns the session cart. With a commerce client it keeps the
//! cart on the platform and remembers its id across sessions; without one,
//! or when the platform is unreachable, it keeps the cart on this device.
//!
//! # Example
//!
//! ```rust
//! use apfol_cart::prelude::*;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let store = CartStore::builder().build();
//! let outcome = store.add_to_cart(&VariantId::new("watchintosh"), 3).await;
//! assert!(outcome.is_updated());
//!
//! let view = store.snapshot();
//! assert_eq!(view.cart.unwrap().total_price.display(), "$78.00");
//! # });
//! ```

mod backend;
mod local;
mod outcome;
mod pointer;
mod store;
mod ui;

pub use backend::CartMode;
pub use local::{LocalCartStore, LOCAL_CART_KEY};
pub use outcome::{CartFailure, CartOutcome};
pub use pointer::{CheckoutPointer, CHECKOUT_POINTER_KEY};
pub use store::{catalog_from_config, CartStore, CartStoreBuilder};
pub use ui::{CartUiState, CartView};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CartFailure, CartMode, CartOutcome, CartStore, CartView};
    pub use apfol_commerce::checkout::CheckoutHandoff;
    pub use apfol_commerce::{Cart, LineItemId, VariantId};
}
