//! Cart state manager.
//!
//! One [`CartStore`] per session. It picks a backend on first use, keeps the
//! authoritative cart in memory, serializes mutations, and publishes a
//! [`CartView`] after every change.

use crate::backend::{CartBackend, CartMode};
use crate::local::LocalCartStore;
use crate::outcome::{CartFailure, CartOutcome};
use crate::pointer::CheckoutPointer;
use crate::ui::CartView;
use apfol_cache::Cache;
use apfol_commerce::catalog::{Catalog, VariantIds};
use apfol_commerce::checkout::{permalink_url, CheckoutHandoff};
use apfol_commerce::{Cart, LineItemId, VariantId};
use apfol_core::AppConfig;
use apfol_storefront::{
    CommerceClient, Endpoint, RetryPolicy, StorefrontClient, StorefrontError, TimeoutConfig,
};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, OnceCell};
use tracing::{debug, info, warn};

/// Shown when a remote cart has no checkout URL.
const CHECKOUT_URL_MISSING_NOTICE: &str = "Checkout is not available for this cart yet.";

/// Handle to a session's cart. Clones share state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

struct Inner {
    cache: Cache,
    client: Option<Arc<dyn CommerceClient>>,
    catalog: Catalog,
    store_domain: Option<String>,
    session: OnceCell<Session>,
    state: watch::Sender<CartView>,
    pending: AtomicUsize,
}

/// Backend and cart chosen by initialization.
struct Session {
    backend: CartBackend,
    cart: Mutex<Cart>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("mode", &self.mode())
            .field("has_client", &self.inner.client.is_some())
            .field("store_domain", &self.inner.store_domain)
            .finish()
    }
}

/// Builder for [`CartStore`].
#[derive(Default)]
pub struct CartStoreBuilder {
    cache: Option<Cache>,
    client: Option<Arc<dyn CommerceClient>>,
    catalog: Option<Catalog>,
    store_domain: Option<String>,
}

impl CartStoreBuilder {
    /// Storage for the local cart and the checkout pointer.
    pub fn cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Commerce client. Without one the store runs in local mode.
    pub fn client(mut self, client: Arc<dyn CommerceClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Store domain used for buy-now permalinks.
    pub fn store_domain(mut self, domain: impl Into<String>) -> Self {
        self.store_domain = Some(domain.into());
        self
    }

    pub fn build(self) -> CartStore {
        let (state, _) = watch::channel(CartView::default());
        CartStore {
            inner: Arc::new(Inner {
                cache: self.cache.unwrap_or_else(Cache::in_memory),
                client: self.client,
                catalog: self
                    .catalog
                    .unwrap_or_else(|| Catalog::builtin(&VariantIds::default())),
                store_domain: self.store_domain,
                session: OnceCell::new(),
                state,
                pending: AtomicUsize::new(0),
            }),
        }
    }
}

/// Built-in catalog with the configured variant ids.
pub fn catalog_from_config(config: &AppConfig) -> Catalog {
    let ids = VariantIds {
        watchintosh: config
            .catalog
            .watchintosh_variant_id
            .as_deref()
            .map(VariantId::new),
        watchtrainer: config
            .catalog
            .watchtrainer_variant_id
            .as_deref()
            .map(VariantId::new),
    };
    Catalog::builtin(&ids)
}

/// Clears `is_loading` when the last in-flight operation finishes.
struct LoadingGuard<'a> {
    inner: &'a Inner,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner
                .state
                .send_modify(|view| view.ui.is_loading = false);
        }
    }
}

impl CartStore {
    pub fn builder() -> CartStoreBuilder {
        CartStoreBuilder::default()
    }

    /// Build a store from configuration.
    ///
    /// A storefront client is attached only when both domain and token are
    /// configured.
    pub fn from_config(config: &AppConfig, cache: Cache) -> Result<Self, StorefrontError> {
        let mut builder = Self::builder()
            .cache(cache)
            .catalog(catalog_from_config(config));

        if let Some((domain, token)) = config.storefront.credentials() {
            let endpoint = Endpoint::new(domain, token, config.storefront.api_version.as_str());
            let client = StorefrontClient::connect(
                endpoint,
                TimeoutConfig::from_millis(config.storefront.timeout_ms),
            )?
            .with_retry(RetryPolicy::new(config.storefront.max_retries));
            builder = builder.client(Arc::new(client));
        }
        if let Some(domain) = config.storefront.domain() {
            builder = builder.store_domain(domain);
        }
        Ok(builder.build())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Initialize if needed. Concurrent callers share one initialization.
    pub async fn init(&self) -> CartMode {
        self.session().await.backend.mode()
    }

    /// Backend mode, `None` before initialization finishes.
    pub fn mode(&self) -> Option<CartMode> {
        self.inner.session.get().map(|s| s.backend.mode())
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().ui.is_loading
    }

    /// Current view.
    pub fn snapshot(&self) -> CartView {
        self.inner.state.borrow().clone()
    }

    /// Receive a new [`CartView`] after every change.
    pub fn subscribe(&self) -> watch::Receiver<CartView> {
        self.inner.state.subscribe()
    }

    pub fn open_cart(&self) {
        self.inner.state.send_modify(|view| view.ui.is_cart_open = true);
    }

    pub fn close_cart(&self) {
        self.inner.state.send_modify(|view| view.ui.is_cart_open = false);
    }

    pub fn toggle_cart(&self) {
        self.inner
            .state
            .send_modify(|view| view.ui.is_cart_open = !view.ui.is_cart_open);
    }

    /// Add units of a variant and open the drawer.
    pub async fn add_to_cart(&self, variant_id: &VariantId, quantity: i64) -> CartOutcome {
        if quantity < 1 {
            return CartOutcome::Unchanged(CartFailure::InvalidQuantity(quantity));
        }
        let _loading = self.begin_loading();
        let session = self.session().await;
        let mut cart = session.cart.lock().await;

        let result = session.backend.add(&cart, variant_id, quantity).await;
        let outcome = self.apply(&mut cart, result);
        if outcome.is_updated() {
            debug!(variant_id = %variant_id, quantity, "Added to cart");
            self.open_cart();
        }
        outcome
    }

    /// Set a line's quantity. Zero or less removes the line.
    pub async fn update_quantity(&self, line_item_id: &LineItemId, quantity: i64) -> CartOutcome {
        let _loading = self.begin_loading();
        let session = self.session().await;
        let mut cart = session.cart.lock().await;

        let result = session.backend.update(&cart, line_item_id, quantity).await;
        self.apply(&mut cart, result)
    }

    pub async fn remove_item(&self, line_item_id: &LineItemId) -> CartOutcome {
        let _loading = self.begin_loading();
        let session = self.session().await;
        let mut cart = session.cart.lock().await;

        let result = session.backend.remove(&cart, line_item_id).await;
        self.apply(&mut cart, result)
    }

    /// Remove every line.
    ///
    /// Remote carts are cleared one line at a time. If a removal fails, the
    /// lines already removed stay removed and the failure is returned.
    pub async fn clear(&self) -> CartOutcome {
        let _loading = self.begin_loading();
        let session = self.session().await;
        let mut cart = session.cart.lock().await;

        if let Some(next) = session.backend.clear_local(&cart) {
            return self.apply(&mut cart, Ok(next));
        }

        let line_ids: Vec<LineItemId> = cart.line_items.iter().map(|l| l.id.clone()).collect();
        for line_item_id in &line_ids {
            match session.backend.remove(&cart, line_item_id).await {
                Ok(next) => {
                    *cart = next;
                    self.publish_cart(&cart);
                }
                Err(failure) => {
                    warn!(cart_id = %cart.id, line_item_id = %line_item_id, error = %failure, "Cart clear stopped early");
                    return CartOutcome::Unchanged(failure);
                }
            }
        }
        CartOutcome::Updated
    }

    /// Where checkout for the current cart should go.
    pub async fn checkout(&self) -> CheckoutHandoff {
        let session = self.session().await;
        if session.backend.mode() == CartMode::Local {
            info!("Checkout requested in local mode");
            return CheckoutHandoff::not_configured();
        }
        let cart = session.cart.lock().await;
        match &cart.checkout_url {
            Some(url) => CheckoutHandoff::Redirect(url.clone()),
            None => {
                warn!(cart_id = %cart.id, "Cart has no checkout URL");
                CheckoutHandoff::Unavailable(CHECKOUT_URL_MISSING_NOTICE.to_string())
            }
        }
    }

    /// Skip the cart and check out a single variant.
    ///
    /// Tries a direct checkout first, then a cart permalink on the configured
    /// domain. The session cart is not touched.
    pub async fn buy_now(
        &self,
        variant_id: &VariantId,
        quantity: i64,
    ) -> Result<CheckoutHandoff, CartFailure> {
        if quantity < 1 {
            return Err(CartFailure::InvalidQuantity(quantity));
        }
        let _loading = self.begin_loading();

        if let Some(client) = &self.inner.client {
            if let Some(url) = client.create_direct_checkout(variant_id, quantity).await {
                return Ok(CheckoutHandoff::Redirect(url));
            }
            warn!(variant_id = %variant_id, quantity, "Direct checkout failed");
        }
        match &self.inner.store_domain {
            Some(domain) => {
                info!(variant_id = %variant_id, quantity, "Using cart permalink for checkout");
                Ok(CheckoutHandoff::Redirect(permalink_url(
                    domain, variant_id, quantity,
                )))
            }
            None => Ok(CheckoutHandoff::not_configured()),
        }
    }

    async fn session(&self) -> &Session {
        self.inner
            .session
            .get_or_init(|| self.initialize())
            .await
    }

    async fn initialize(&self) -> Session {
        let _loading = self.begin_loading();

        let (backend, cart) = match &self.inner.client {
            None => {
                info!("No commerce client configured, using local cart");
                self.local_session()
            }
            Some(client) => match self.remote_cart(client.as_ref()).await {
                Some(cart) => {
                    info!(cart_id = %cart.id, "Using remote cart");
                    (CartBackend::Remote(Arc::clone(client)), cart)
                }
                None => {
                    warn!("Remote cart unavailable, falling back to local cart");
                    self.local_session()
                }
            },
        };

        let mode = backend.mode();
        self.inner.state.send_modify(|view| {
            view.cart = Some(cart.clone());
            view.mode = Some(mode);
        });
        Session {
            backend,
            cart: Mutex::new(cart),
        }
    }

    fn local_session(&self) -> (CartBackend, Cart) {
        let store = LocalCartStore::new(self.inner.cache.clone());
        let cart = store.load();
        let backend = CartBackend::Local {
            store,
            catalog: self.inner.catalog.clone(),
        };
        (backend, cart)
    }

    /// Resume the stored cart or create a new one.
    async fn remote_cart(&self, client: &dyn CommerceClient) -> Option<Cart> {
        let pointer = CheckoutPointer::new(self.inner.cache.clone());

        if let Some(cart_id) = pointer.load() {
            if let Some(cart) = client.fetch_cart(&cart_id).await {
                return Some(cart);
            }
            info!(cart_id = %cart_id, "Stored cart is gone, creating a new one");
            if let Err(e) = pointer.clear() {
                warn!(error = %e, "Failed to clear checkout pointer");
            }
        }

        let cart = client.create_cart().await?;
        if let Err(e) = pointer.store(&cart.id) {
            warn!(cart_id = %cart.id, error = %e, "Failed to store checkout pointer");
        }
        Some(cart)
    }

    fn apply(&self, cart: &mut Cart, result: Result<Cart, CartFailure>) -> CartOutcome {
        match result {
            Ok(next) => {
                *cart = next;
                self.publish_cart(cart);
                CartOutcome::Updated
            }
            Err(failure) => {
                warn!(cart_id = %cart.id, error = %failure, "Cart operation failed");
                CartOutcome::Unchanged(failure)
            }
        }
    }

    fn publish_cart(&self, cart: &Cart) {
        self.inner
            .state
            .send_modify(|view| view.cart = Some(cart.clone()));
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        if self.inner.pending.fetch_add(1, Ordering::SeqCst) == 0 {
            self.inner
                .state
                .send_modify(|view| view.ui.is_loading = true);
        }
        LoadingGuard { inner: &self.inner }
    }
}
