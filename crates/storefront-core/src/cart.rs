//! # Cart
//!
//! The id-keyed collection of cart lines and every mutation the UI can apply.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  UI Action              Cart Method              Effect                 │
//! │  ─────────              ───────────              ──────                 │
//! │                                                                         │
//! │  Load from backend ───► normalize_by_id() ─────► replace whole cart     │
//! │                                                                         │
//! │  Click "+" ───────────► increase_quantity() ───► qty + 1 (no cap)      │
//! │                                                                         │
//! │  Click "−" ───────────► decrease_quantity() ───► qty − 1 (floor 1)     │
//! │                                                                         │
//! │  Click trash ─────────► remove_line() ─────────► entry gone            │
//! │                                                                         │
//! │  Type a note ─────────► set_note() ────────────► note replaced         │
//! │                                                                         │
//! │  NOTE: Methods taking an id report LineNotFound instead of inventing   │
//! │        an empty entry for an unknown id.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartLine, LineId};
use crate::MIN_LINE_QUANTITY;

// =============================================================================
// Normalization
// =============================================================================

/// Turns a list of lines into an id-keyed cart.
///
/// When the same id appears more than once, the last occurrence wins.
///
/// ## Example
/// ```rust
/// use storefront_core::{normalize_by_id, CartLine, Money};
///
/// let cart = normalize_by_id(vec![
///     CartLine::new(1, "Old", 1, "A", Money::from_cents(100)),
///     CartLine::new(1, "New", 4, "A", Money::from_cents(100)),
/// ]);
/// assert_eq!(cart.len(), 1);
/// assert_eq!(cart.get(1).unwrap().name, "New");
/// ```
pub fn normalize_by_id<I>(lines: I) -> Cart
where
    I: IntoIterator<Item = CartLine>,
{
    lines.into_iter().collect()
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart, keyed by line id.
///
/// ## Invariants
/// - Keys are unique and always equal the `id` of the line they map to
/// - Quantities never drop below [`MIN_LINE_QUANTITY`] through `decrease_quantity`
/// - Removed lines are gone, not tombstoned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<LineId, CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Returns the line with this id, if present.
    pub fn get(&self, id: LineId) -> Option<&CartLine> {
        self.lines.get(&id)
    }

    /// Checks if a line with this id is present.
    pub fn contains(&self, id: LineId) -> bool {
        self.lines.contains_key(&id)
    }

    /// Iterates over lines in ascending id order.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Iterates over line ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = LineId> + '_ {
        self.lines.keys().copied()
    }

    /// Returns the number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Inserts or replaces a line, returning the previous line with that id.
    pub fn upsert(&mut self, line: CartLine) -> Option<CartLine> {
        self.lines.insert(line.id, line)
    }

    /// Adds one to a line's quantity and returns the new quantity.
    pub fn increase_quantity(&mut self, id: LineId) -> CoreResult<u32> {
        let line = self.line_mut(id)?;
        line.quantity = line.quantity.saturating_add(1);
        Ok(line.quantity)
    }

    /// Subtracts one from a line's quantity, stopping at the minimum.
    ///
    /// Returns the new quantity; a line already at the minimum is unchanged.
    pub fn decrease_quantity(&mut self, id: LineId) -> CoreResult<u32> {
        let line = self.line_mut(id)?;
        if line.quantity > MIN_LINE_QUANTITY {
            line.quantity -= 1;
        }
        Ok(line.quantity)
    }

    /// Replaces a line's note verbatim.
    pub fn set_note(&mut self, id: LineId, note: impl Into<String>) -> CoreResult<()> {
        self.line_mut(id)?.note = note.into();
        Ok(())
    }

    /// Removes a line. Returns `None` when it was not in the cart.
    pub fn remove_line(&mut self, id: LineId) -> Option<CartLine> {
        self.lines.remove(&id)
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Calculates display totals.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    fn line_mut(&mut self, id: LineId) -> CoreResult<&mut CartLine> {
        self.lines.get_mut(&id).ok_or(CoreError::LineNotFound(id))
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        let mut cart = Cart::new();
        for line in iter {
            cart.upsert(line);
        }
        cart
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Number of distinct lines.
    #[ts(type = "number")]
    pub line_count: usize,

    /// Sum of all quantities.
    #[ts(type = "number")]
    pub total_quantity: u64,

    /// Σ unit price × quantity, in cents.
    #[ts(type = "number")]
    #[serde(rename = "subtotalCents")]
    pub subtotal: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.len(),
            total_quantity: cart.lines().map(|l| u64::from(l.quantity)).sum(),
            subtotal: cart.lines().map(CartLine::line_total).sum(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_line(id: LineId, quantity: u32) -> CartLine {
        CartLine::new(id, format!("Item {}", id), quantity, format!("SKU-{}", id), Money::from_cents(990))
            .with_image_url(format!("https://img.example/{}.png", id))
    }

    fn test_cart() -> Cart {
        normalize_by_id(vec![test_line(1, 2), test_line(2, 1), test_line(3, 5)])
    }

    #[test]
    fn test_normalize_keys_by_id() {
        let cart = test_cart();
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.ids().collect::<Vec<_>>(), vec![1, 2, 3]);
        for line in cart.lines() {
            assert_eq!(cart.get(line.id), Some(line));
        }
    }

    #[test]
    fn test_normalize_empty() {
        let cart = normalize_by_id(Vec::new());
        assert!(cart.is_empty());
        assert_eq!(cart.totals(), CartTotals::default());
    }

    #[test]
    fn test_increase_quantity_changes_only_that_line() {
        let mut cart = test_cart();
        let before = cart.clone();

        assert_eq!(cart.increase_quantity(1).unwrap(), 3);

        let mut expected = before.get(1).unwrap().clone();
        expected.quantity = 3;
        assert_eq!(cart.get(1), Some(&expected));
        assert_eq!(cart.get(2), before.get(2));
        assert_eq!(cart.get(3), before.get(3));
    }

    #[test]
    fn test_decrease_quantity_floors_at_one() {
        let mut cart = test_cart();

        assert_eq!(cart.decrease_quantity(2).unwrap(), 1);
        assert_eq!(cart.get(2).unwrap().quantity, 1);

        assert_eq!(cart.decrease_quantity(3).unwrap(), 4);
        assert_eq!(cart.decrease_quantity(1).unwrap(), 1);
        assert_eq!(cart.decrease_quantity(1).unwrap(), 1);
    }

    #[test]
    fn test_unknown_id_reports_not_found() {
        let mut cart = test_cart();
        let before = cart.clone();

        assert!(matches!(cart.increase_quantity(99), Err(CoreError::LineNotFound(99))));
        assert!(matches!(cart.decrease_quantity(99), Err(CoreError::LineNotFound(99))));
        assert!(matches!(cart.set_note(99, "x"), Err(CoreError::LineNotFound(99))));
        assert_eq!(cart, before);
        assert!(!cart.contains(99));
    }

    #[test]
    fn test_remove_line_is_idempotent() {
        let mut cart = test_cart();

        assert!(cart.remove_line(2).is_some());
        assert!(!cart.contains(2));
        let after_first = cart.clone();

        assert!(cart.remove_line(2).is_none());
        assert_eq!(cart, after_first);
    }

    #[test]
    fn test_set_note_overwrites() {
        let mut cart = test_cart();

        cart.set_note(1, "no onions").unwrap();
        cart.set_note(1, "extra cheese").unwrap();
        assert_eq!(cart.get(1).unwrap().note, "extra cheese");

        let once = cart.clone();
        cart.set_note(1, "extra cheese").unwrap();
        assert_eq!(cart, once);
    }

    #[test]
    fn test_set_note_keeps_text_verbatim() {
        let mut cart = test_cart();
        let note = "  sem cebola\n\t🍕  ".repeat(500);

        cart.set_note(3, note.clone()).unwrap();
        assert_eq!(cart.get(3).unwrap().note, note);
    }

    #[test]
    fn test_totals() {
        let cart = test_cart();
        let totals = cart.totals();

        assert_eq!(totals.line_count, 3);
        assert_eq!(totals.total_quantity, 8);
        assert_eq!(totals.subtotal.cents(), 990 * 8);
    }

    #[test]
    fn test_clear() {
        let mut cart = test_cart();
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serializes_as_id_keyed_map() {
        let cart = normalize_by_id(vec![test_line(5, 1)]);
        let value = serde_json::to_value(&cart).unwrap();

        assert_eq!(value["5"]["quantity"], 1);
        let back: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(back, cart);
    }
}
