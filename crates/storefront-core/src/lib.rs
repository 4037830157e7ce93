//! # storefront-core: Pure Cart Logic for the Storefront
//!
//! This crate holds the cart model and every transform applied to it, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Storefront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI layer / cart-cli                          │   │
//! │  │    Cart list ──► Quantity +/- ──► Notes ──► Checkout            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              storefront-client (CartStore + HTTP)               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │   wire    │  │   money   │  │   │
//! │  │   │ CartLine  │  │   Cart    │  │ LineDto   │  │   Money   │  │   │
//! │  │   │  Order    │  │ normalize │  │ payloads  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CartLine, CheckoutRequest, Order)
//! - [`cart`] - The id-keyed cart and its mutations
//! - [`wire`] - Backend wire format and response normalization
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Rules applied to lines arriving from the backend
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::cart::normalize_by_id;
//! use storefront_core::money::Money;
//! use storefront_core::types::CartLine;
//!
//! let line = CartLine::new(5, "Pizza", 2, "PZ-01", Money::from_cents(990));
//! let mut cart = normalize_by_id(vec![line]);
//!
//! cart.increase_quantity(5).unwrap();
//! assert_eq!(cart.get(5).unwrap().quantity, 3);
//! assert_eq!(cart.totals().subtotal.cents(), 2970);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;
pub mod wire;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{normalize_by_id, Cart, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest quantity a cart line can hold.
///
/// Decrementing a line that is already at this value leaves it unchanged;
/// removing a line is a separate, explicit operation.
pub const MIN_LINE_QUANTITY: u32 = 1;
