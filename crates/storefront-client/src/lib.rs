//! # storefront-client: Cart Store for the Storefront
//!
//! This crate holds the shopping cart state the UI renders and talks to the
//! backend to fill and submit it.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Store Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                     CartStore (cloneable handle)                 │  │
//! │  │                                                                  │  │
//! │  │  cart, loading, fetch/checkout messages, order id                │  │
//! │  │  load / reload / checkout        (async, guarded)                │  │
//! │  │  increase / decrease / delete / note / clear   (sync)            │  │
//! │  └───────────┬──────────────────────────────┬───────────────────────┘  │
//! │              │                              │                           │
//! │              ▼                              ▼                           │
//! │  ┌──────────────────────┐       ┌──────────────────────────┐           │
//! │  │   HttpTransport      │       │   CartEventEmitter       │           │
//! │  │                      │       │                          │           │
//! │  │ GET  /carrinho       │       │ snapshot after changes   │           │
//! │  │ POST /carrinho       │       │ advisory error messages  │           │
//! │  └──────────────────────┘       └──────────────────────────┘           │
//! │                                                                         │
//! │  Normalization, wire format and cart rules live in storefront-core.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Backend URL, paths, timeout, messages, display (TOML + env)
//! - [`error`] - Client error types
//! - [`events`] - Event emitter trait for UI notifications
//! - [`store`] - The `CartStore` and its builder
//! - [`transport`] - HTTP transport trait and the `reqwest` implementation
//!
//! ## Usage
//! ```rust,ignore
//! use storefront_client::{CartStoreBuilder, StorefrontConfig};
//!
//! let config = StorefrontConfig::load(None)?;
//! let store = CartStoreBuilder::from_config(&config)?.open().await;
//!
//! store.increase_quantity(5);
//! store.checkout(serde_json::json!({ "nome": "Ana" })).await;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod store;
pub mod transport;

pub use config::{Locale, Messages, StorefrontConfig};
pub use error::{ClientError, ClientResult};
pub use events::{CartEventEmitter, ErrorKind, NoOpEmitter};
pub use store::{CartSnapshot, CartStore, CartStoreBuilder, RequestOutcome};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
