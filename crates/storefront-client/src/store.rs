//! # Cart Store
//!
//! The state container the UI binds to: the cart, its request status and the
//! advisory messages, plus every operation that changes them.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CartStore Lifecycle                              │
//! │                                                                         │
//! │   open()/spawn()                                                        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌───────────┐  load()/reload()  ┌───────────┐   ok    ┌───────────┐   │
//! │  │   Idle    │ ────────────────► │  Loading  │ ──────► │   Idle    │   │
//! │  │           │  checkout()       │           │         │ (updated) │   │
//! │  └───────────┘ ────────────────► │ (guarded) │ ──────► └───────────┘   │
//! │        ▲                         └─────┬─────┘  error   message set    │
//! │        │                               │                               │
//! │        │   edits (+, −, delete, note)  │  a second load/checkout       │
//! │        └── apply at any time           │  while Loading is Skipped     │
//! │                                        ▼                               │
//! │                                  close() / last handle dropped         │
//! │                                  ──► late completions are Discarded    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! State sits behind a `std::sync::Mutex` that is only ever taken for short,
//! synchronous sections. Network round trips run with the lock released; the
//! in-flight flag is checked and set in the same critical section that starts
//! a request, so two tasks can never both pass the guard.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use storefront_core::wire::{decode_cart, decode_order_id, encode_checkout};
use storefront_core::{Cart, CartTotals, CheckoutRequest, CoreError, CoreResult, LineId, Order};
use tracing::{debug, info, warn};

use crate::config::{Messages, StorefrontConfig};
use crate::error::{ClientError, ClientResult};
use crate::events::{CartEventEmitter, ErrorKind, NoOpEmitter};
use crate::transport::{ApiRequest, HttpTransport, ReqwestTransport};

// =============================================================================
// Snapshot
// =============================================================================

/// A serializable copy of everything the store exposes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub cart: Cart,
    pub totals: CartTotals,
    /// A load or checkout is in flight.
    pub loading: bool,
    /// Empty unless the last load failed.
    pub fetch_error_message: String,
    /// Empty unless the last checkout failed.
    pub checkout_error_message: String,
    /// Empty until a checkout succeeds.
    pub order_id: String,
    pub placed_at: Option<DateTime<Utc>>,
    /// When the cart was last loaded successfully.
    pub loaded_at: Option<DateTime<Utc>>,
}

/// How a load or checkout call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The request succeeded and state was updated.
    Completed,
    /// The request failed; the matching error message is set.
    Failed,
    /// Another request was in flight (or the store was closed), nothing sent.
    Skipped,
    /// The response arrived after the store was closed and was ignored.
    Discarded,
}

impl RequestOutcome {
    pub fn is_completed(self) -> bool {
        self == RequestOutcome::Completed
    }
}

// =============================================================================
// Shared State
// =============================================================================

#[derive(Debug, Default)]
struct StoreState {
    cart: Cart,
    loading: bool,
    fetch_error_message: String,
    checkout_error_message: String,
    order: Option<Order>,
    loaded_at: Option<DateTime<Utc>>,
    closed: bool,
}

impl StoreState {
    fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            cart: self.cart.clone(),
            totals: self.cart.totals(),
            loading: self.loading,
            fetch_error_message: self.fetch_error_message.clone(),
            checkout_error_message: self.checkout_error_message.clone(),
            order_id: self
                .order
                .as_ref()
                .map(|o| o.order_id.clone())
                .unwrap_or_default(),
            placed_at: self.order.as_ref().map(|o| o.placed_at),
            loaded_at: self.loaded_at,
        }
    }

    /// Marks a request as started unless one is running or the store is closed.
    fn try_begin(&mut self, kind: ErrorKind) -> bool {
        if self.closed {
            debug!(request = %kind, "Store closed, not starting request");
            return false;
        }
        if self.loading {
            warn!(request = %kind, "Request already in flight, ignoring");
            return false;
        }

        self.loading = true;
        match kind {
            ErrorKind::Fetch => self.fetch_error_message.clear(),
            ErrorKind::Checkout => self.checkout_error_message.clear(),
        }
        true
    }
}

#[derive(Debug, Clone)]
struct Endpoints {
    cart_path: String,
    checkout_path: String,
}

struct Inner {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
    messages: Messages,
    emitter: Arc<dyn CartEventEmitter>,
    state: Mutex<StoreState>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("Cart store mutex poisoned")
    }

    fn publish(&self) {
        let snapshot = self.lock().snapshot();
        self.emitter.emit_snapshot(&snapshot);
    }

    fn publish_error(&self, kind: ErrorKind, message: &str) {
        self.publish();
        self.emitter.emit_error(kind, message);
    }

    fn begin_load(&self) -> Option<ApiRequest> {
        if !self.lock().try_begin(ErrorKind::Fetch) {
            return None;
        }
        self.publish();
        Some(ApiRequest::get(self.endpoints.cart_path.as_str()))
    }

    fn finish_load(&self, result: ClientResult<Cart>) -> RequestOutcome {
        let outcome = {
            let mut state = self.lock();
            if state.closed {
                debug!("Cart response arrived after close, discarding");
                return RequestOutcome::Discarded;
            }
            state.loading = false;

            match result {
                Ok(cart) => {
                    info!(lines = cart.len(), "Cart loaded");
                    state.cart = cart;
                    state.loaded_at = Some(Utc::now());
                    RequestOutcome::Completed
                }
                Err(e) => {
                    warn!(error = %e, retryable = e.is_retryable(), "Failed to load cart");
                    state.fetch_error_message = self.messages.fetch_error.clone();
                    RequestOutcome::Failed
                }
            }
        };

        match outcome {
            RequestOutcome::Failed => self.publish_error(ErrorKind::Fetch, &self.messages.fetch_error),
            _ => self.publish(),
        }
        outcome
    }

    fn begin_checkout(&self, user_info: Value) -> Option<CheckoutRequest> {
        let request = {
            let mut state = self.lock();
            if !state.try_begin(ErrorKind::Checkout) {
                return None;
            }
            CheckoutRequest::from_cart(&state.cart, user_info)
        };
        self.publish();
        Some(request)
    }

    fn finish_checkout(&self, result: ClientResult<String>) -> RequestOutcome {
        let outcome = {
            let mut state = self.lock();
            if state.closed {
                debug!("Checkout response arrived after close, discarding");
                return RequestOutcome::Discarded;
            }
            state.loading = false;

            match result {
                Ok(order_id) => {
                    info!(order_id = %order_id, "Order placed");
                    state.order = Some(Order::new(order_id));
                    RequestOutcome::Completed
                }
                Err(e) => {
                    warn!(error = %e, retryable = e.is_retryable(), "Checkout failed");
                    state.checkout_error_message = self.messages.checkout_error.clone();
                    RequestOutcome::Failed
                }
            }
        };

        match outcome {
            RequestOutcome::Failed => {
                self.publish_error(ErrorKind::Checkout, &self.messages.checkout_error)
            }
            _ => self.publish(),
        }
        outcome
    }
}

// =============================================================================
// Request Runners
// =============================================================================
//
// Between starting a request and handling its response the runners hold only
// a Weak reference, so dropping every CartStore handle mid-request means the
// response finds nothing to update.

async fn complete_load(
    store: Weak<Inner>,
    transport: Arc<dyn HttpTransport>,
    request: ApiRequest,
) -> RequestOutcome {
    let result = match transport.send(request).await {
        Ok(response) => decode_cart(response.data).map_err(ClientError::from),
        Err(e) => Err(e),
    };

    match store.upgrade() {
        Some(inner) => inner.finish_load(result),
        None => {
            debug!("Cart store dropped before load completed");
            RequestOutcome::Discarded
        }
    }
}

async fn complete_checkout(
    store: Weak<Inner>,
    transport: Arc<dyn HttpTransport>,
    path: String,
    request: CheckoutRequest,
) -> RequestOutcome {
    if request.is_empty() {
        info!("Submitting checkout with an empty cart");
    } else {
        debug!(items = request.items.len(), "Submitting checkout");
    }
    let result = submit_checkout(transport.as_ref(), path, &request).await;

    match store.upgrade() {
        Some(inner) => inner.finish_checkout(result),
        None => {
            debug!("Cart store dropped before checkout completed");
            RequestOutcome::Discarded
        }
    }
}

async fn submit_checkout(
    transport: &dyn HttpTransport,
    path: String,
    request: &CheckoutRequest,
) -> ClientResult<String> {
    let body = encode_checkout(request)?;
    let response = transport.send(ApiRequest::post(path, body)).await?;
    Ok(decode_order_id(&response.data)?)
}

// =============================================================================
// Cart Store
// =============================================================================

/// Handle to the shared cart state. Clones share the same cart.
///
/// ## Usage
/// ```rust,ignore
/// let store = CartStoreBuilder::from_config(&config)?.open().await;
///
/// store.increase_quantity(5);
/// store.set_note(5, "sem cebola");
///
/// if store.checkout(user_info).await.is_completed() {
///     println!("order {}", store.snapshot().order_id);
/// }
/// ```
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("endpoints", &self.inner.endpoints)
            .field("state", &*self.inner.lock())
            .finish()
    }
}

impl CartStore {
    /// Creates a store from configuration and waits for the first load.
    pub async fn from_config(config: &StorefrontConfig) -> ClientResult<Self> {
        Ok(CartStoreBuilder::from_config(config)?.open().await)
    }

    // -------------------------------------------------------------------------
    // Requests
    // -------------------------------------------------------------------------

    /// Fetches the cart and replaces the local one.
    ///
    /// On failure the cart is left as it was and `fetch_error_message` is set.
    pub async fn load(&self) -> RequestOutcome {
        let Some(request) = self.inner.begin_load() else {
            return RequestOutcome::Skipped;
        };
        complete_load(
            Arc::downgrade(&self.inner),
            Arc::clone(&self.inner.transport),
            request,
        )
        .await
    }

    /// Retries loading the cart. Same as [`CartStore::load`].
    pub async fn reload(&self) -> RequestOutcome {
        self.load().await
    }

    /// Submits every line plus `user_info` and records the order id.
    ///
    /// On failure `order_id` stays as it was, the cart is untouched and
    /// `checkout_error_message` is set.
    pub async fn checkout(&self, user_info: Value) -> RequestOutcome {
        let Some(request) = self.inner.begin_checkout(user_info) else {
            return RequestOutcome::Skipped;
        };
        complete_checkout(
            Arc::downgrade(&self.inner),
            Arc::clone(&self.inner.transport),
            self.inner.endpoints.checkout_path.clone(),
            request,
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------
    //
    // Each edit returns whether a line matched. Unknown ids change nothing.

    /// Adds one to a line's quantity.
    pub fn increase_quantity(&self, id: LineId) -> bool {
        self.edit("increase_quantity", id, |cart| {
            let quantity = cart.increase_quantity(id)?;
            debug!(line_id = id, quantity, "Quantity increased");
            Ok(())
        })
    }

    /// Takes one from a line's quantity, never going below 1.
    pub fn decrease_quantity(&self, id: LineId) -> bool {
        self.edit("decrease_quantity", id, |cart| {
            let quantity = cart.decrease_quantity(id)?;
            debug!(line_id = id, quantity, "Quantity decreased");
            Ok(())
        })
    }

    /// Removes a line.
    pub fn delete_line(&self, id: LineId) -> bool {
        self.edit("delete_line", id, |cart| {
            cart.remove_line(id).ok_or(CoreError::LineNotFound(id))?;
            debug!(line_id = id, "Line removed");
            Ok(())
        })
    }

    /// Replaces a line's note with `note`, exactly as given.
    pub fn set_note(&self, id: LineId, note: impl Into<String>) -> bool {
        let note = note.into();
        self.edit("set_note", id, move |cart| {
            cart.set_note(id, note)?;
            debug!(line_id = id, "Note updated");
            Ok(())
        })
    }

    /// Empties the cart and forgets the last order and both messages.
    pub fn clear(&self) {
        {
            let mut state = self.inner.lock();
            state.cart.clear();
            state.order = None;
            state.fetch_error_message.clear();
            state.checkout_error_message.clear();
        }
        info!("Cart cleared");
        self.inner.publish();
    }

    fn edit<F>(&self, operation: &'static str, id: LineId, f: F) -> bool
    where
        F: FnOnce(&mut Cart) -> CoreResult<()>,
    {
        let result = f(&mut self.inner.lock().cart);

        match result {
            Ok(()) => {
                self.inner.publish();
                true
            }
            Err(e) => {
                debug!(operation, line_id = id, error = %e, "Ignoring edit");
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Returns a copy of the exposed state.
    pub fn snapshot(&self) -> CartSnapshot {
        self.inner.lock().snapshot()
    }

    /// Runs `f` with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let subtotal = store.with_cart(|cart| cart.totals().subtotal);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.inner.lock().cart)
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().loading
    }

    /// The last confirmed order, if any.
    pub fn order(&self) -> Option<Order> {
        self.inner.lock().order.clone()
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Stops the store from accepting responses or starting requests.
    ///
    /// Requests already in flight still finish on the network, but their
    /// results are dropped.
    pub fn close(&self) {
        let mut state = self.inner.lock();
        if !state.closed {
            state.closed = true;
            debug!("Cart store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`CartStore`].
pub struct CartStoreBuilder {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
    messages: Messages,
    emitter: Arc<dyn CartEventEmitter>,
}

impl CartStoreBuilder {
    /// Starts a builder around a transport, with default paths and messages.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let defaults = StorefrontConfig::default();
        CartStoreBuilder {
            transport,
            endpoints: Endpoints {
                cart_path: defaults.api.cart_path,
                checkout_path: defaults.api.checkout_path,
            },
            messages: Messages::default(),
            emitter: Arc::new(NoOpEmitter),
        }
    }

    /// Starts a builder with a `reqwest` transport for the configured backend.
    pub fn from_config(config: &StorefrontConfig) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(&config.api)?;
        info!(base_url = %transport.base_url(), "Cart backend configured");
        Ok(Self::new(Arc::new(transport)).with_config(config))
    }

    /// Takes paths and messages from `config`. Keeps the current transport.
    pub fn with_config(mut self, config: &StorefrontConfig) -> Self {
        self.endpoints = Endpoints {
            cart_path: config.api.cart_path.clone(),
            checkout_path: config.api.checkout_path.clone(),
        };
        self.messages = config.messages();
        self
    }

    pub fn with_emitter(mut self, emitter: Arc<dyn CartEventEmitter>) -> Self {
        self.emitter = emitter;
        self
    }

    /// Builds the store without loading anything.
    pub fn build(self) -> CartStore {
        CartStore {
            inner: Arc::new(Inner {
                transport: self.transport,
                endpoints: self.endpoints,
                messages: self.messages,
                emitter: self.emitter,
                state: Mutex::new(StoreState::default()),
            }),
        }
    }

    /// Builds the store and waits for the first load.
    pub async fn open(self) -> CartStore {
        let store = self.build();
        store.load().await;
        store
    }

    /// Builds the store and runs the first load on a background task.
    ///
    /// Returns immediately with `loading` already set. Must be called from
    /// within a Tokio runtime.
    pub fn spawn(self) -> CartStore {
        let store = self.build();

        if let Some(request) = store.inner.begin_load() {
            let weak = Arc::downgrade(&store.inner);
            let transport = Arc::clone(&store.inner.transport);
            tokio::spawn(complete_load(weak, transport, request));
        }

        store
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
