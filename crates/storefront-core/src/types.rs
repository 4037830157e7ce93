//! # Domain Types
//!
//! Core domain types used throughout the storefront cart.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartLine     │   │ CheckoutRequest │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (key)       │   │  items          │   │  order_id       │       │
//! │  │  name, sku      │   │  user_info      │   │  placed_at      │       │
//! │  │  quantity ≥ 1   │   │  (opaque JSON)  │   │                 │       │
//! │  │  note           │   └─────────────────┘   └─────────────────┘       │
//! │  │  unit_price     │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! These are the UI-facing shapes (camelCase JSON, exported to TypeScript).
//! The backend's own field names live in [`crate::wire`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use ts_rs::TS;

use crate::cart::Cart;
use crate::money::Money;

/// Identifier of a line within a cart. Assigned by the backend.
pub type LineId = u64;

// =============================================================================
// Cart Line
// =============================================================================

/// One line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Unique key within the cart.
    #[ts(type = "number")]
    pub id: LineId,

    /// Display name.
    pub name: String,

    /// Quantity in cart, never below 1.
    pub quantity: u32,

    /// Stock keeping unit.
    pub sku: String,

    /// Product image shown next to the line.
    pub image_url: String,

    /// Free-text customer note (e.g. "no onions"). Empty when unset.
    pub note: String,

    /// Unit price in cents.
    #[ts(type = "number")]
    #[serde(rename = "unitPriceCents")]
    pub unit_price: Money,

    /// The unit price exactly as the backend sent it, echoed back at checkout.
    /// `unit_price` is rounded to cents; this is not.
    #[ts(skip)]
    #[serde(skip)]
    pub listed_price: Option<Number>,
}

impl CartLine {
    /// Creates a line with no image and an empty note.
    pub fn new(
        id: LineId,
        name: impl Into<String>,
        quantity: u32,
        sku: impl Into<String>,
        unit_price: Money,
    ) -> Self {
        CartLine {
            id,
            name: name.into(),
            quantity,
            sku: sku.into(),
            image_url: String::new(),
            note: String::new(),
            unit_price,
            listed_price: None,
        }
    }

    /// Sets the image URL (builder style, mostly for fixtures).
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Records the backend's own price number.
    pub fn with_listed_price(mut self, price: Number) -> Self {
        self.listed_price = Some(price);
        self
    }

    /// Calculates the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

// =============================================================================
// Checkout Request
// =============================================================================

/// Everything submitted at checkout.
///
/// `user_info` is whatever the checkout form collected (name, address,
/// payment choice...). The cart never looks inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub items: Vec<CartLine>,
    pub user_info: Value,
}

impl CheckoutRequest {
    /// Builds a request from the current cart contents, ordered by line id.
    pub fn from_cart(cart: &Cart, user_info: Value) -> Self {
        CheckoutRequest {
            items: cart.lines().cloned().collect(),
            user_info,
        }
    }

    /// Checks if there is nothing to order.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Order
// =============================================================================

/// Confirmation of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Identifier assigned by the backend.
    pub order_id: String,

    /// When the confirmation was received.
    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Creates an order confirmed now.
    pub fn new(order_id: impl Into<String>) -> Self {
        Order {
            order_id: order_id.into(),
            placed_at: Utc::now(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
