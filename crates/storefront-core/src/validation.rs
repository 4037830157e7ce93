//! # Validation Module
//!
//! Rules a line must satisfy before it is allowed into the cart.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Backend                                                      │
//! │  └── Owns the catalog; sends what it believes is valid                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Wire decoding (THIS MODULE)                                  │
//! │  ├── quantity ≥ 1                                                      │
//! │  ├── unit price finite and ≥ 0                                         │
//! │  └── sku present                                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart mutations                                               │
//! │  └── Keep the invariants (floor at 1, no phantom entries)              │
//! │                                                                         │
//! │  Notes are deliberately NOT validated: any text is accepted verbatim.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::MIN_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a SKU.
///
/// Must not be empty or whitespace. Length is the backend's business.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_sku;
///
/// assert!(validate_sku("PZ-01").is_ok());
/// assert!(validate_sku("  ").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    if sku.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    Ok(())
}

/// Validates a wire quantity and narrows it to the cart's quantity type.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_quantity;
///
/// assert_eq!(validate_quantity(3).unwrap(), 3);
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    if qty < i64::from(MIN_LINE_QUANTITY) {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    u32::try_from(qty).map_err(|_| ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: i64::from(MIN_LINE_QUANTITY),
        max: i64::from(u32::MAX),
    })
}

/// Validates a wire unit price and converts it to [`Money`].
///
/// ## Rules
/// - Must be a finite number
/// - Must be non-negative (zero is allowed for free items)
pub fn validate_unit_price(amount: f64) -> ValidationResult<Money> {
    let price = Money::from_decimal(amount).ok_or_else(|| ValidationError::InvalidFormat {
        field: "unit price".to_string(),
        reason: "must be a finite number".to_string(),
    })?;

    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("S1").is_ok());
        assert!(validate_sku("PIZZA MARGHERITA/G").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku(&"A".repeat(65)).is_ok());
        assert!(validate_sku(&"SKU-".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(1).unwrap(), 1);
        assert_eq!(validate_quantity(1000).unwrap(), 1000);

        assert!(matches!(
            validate_quantity(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_quantity(-3).is_err());
        assert!(matches!(
            validate_quantity(i64::from(u32::MAX) + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_unit_price() {
        assert_eq!(validate_unit_price(9.9).unwrap().cents(), 990);
        assert_eq!(validate_unit_price(0.0).unwrap().cents(), 0);

        assert!(matches!(
            validate_unit_price(-1.0),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_unit_price(f64::NAN),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
