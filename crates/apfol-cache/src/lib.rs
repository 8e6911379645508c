//! Type-safe key-value persistence for the Apfol storefront.
//!
//! Plays the role browser-local storage plays for a web storefront: a flat
//! string-keyed store that survives restarts, with JSON serialization on top.
//!
//! # Example
//!
//! ```rust
//! use apfol_cache::Cache;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Pointer {
//!     cart_id: String,
//! }
//!
//! let cache = Cache::in_memory();
//! cache.set("apfol_checkout_id", &Pointer { cart_id: "c1".into() })?;
//!
//! let back: Option<Pointer> = cache.get("apfol_checkout_id")?;
//! assert_eq!(back.unwrap().cart_id, "c1");
//!
//! cache.delete("apfol_checkout_id")?;
//! # Ok::<(), apfol_cache::CacheError>(())
//! ```

mod backend;
mod error;
mod kv;

pub use backend::{FileBackend, MemoryBackend, StoreBackend};
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileBackend, MemoryBackend, StoreBackend};
}
