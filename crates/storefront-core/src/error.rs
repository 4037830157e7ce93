//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Cart and payload errors                        │
//! │  └── ValidationError  - A backend line broke a cart rule               │
//! │                                                                         │
//! │  storefront-client errors (separate crate)                             │
//! │  └── ClientError      - Config, transport and HTTP failures            │
//! │                                                                         │
//! │  CartStore state (what the UI sees)                                    │
//! │  └── fetch / checkout advisory messages                                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → advisory message    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::LineId;

// =============================================================================
// Core Error
// =============================================================================

/// Core cart errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line with this id is in the cart.
    ///
    /// ## When This Occurs
    /// - The UI acts on a line that was deleted in the meantime
    /// - The cart was replaced by a reload that no longer contains the id
    #[error("Cart line not found: {0}")]
    LineNotFound(LineId),

    /// The backend response could not be read as a cart.
    #[error("Invalid cart payload: {0}")]
    InvalidPayload(String),

    /// The checkout confirmation carried no order identifier.
    #[error("Order confirmation did not include an order id")]
    MissingOrderId,

    /// A line failed validation (wraps ValidationError).
    #[error("Invalid cart line {id}: {source}")]
    InvalidLine {
        id: LineId,
        #[source]
        source: ValidationError,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., a price that is not a finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CoreError::LineNotFound(42).to_string(), "Cart line not found: 42");

        let err = CoreError::InvalidLine {
            id: 7,
            source: ValidationError::MustBePositive {
                field: "quantity".to_string(),
            },
        };
        assert_eq!(err.to_string(), "Invalid cart line 7: quantity must be positive");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::InvalidFormat {
            field: "unit price".to_string(),
            reason: "must be a finite number".to_string(),
        };
        assert_eq!(err.to_string(), "unit price has invalid format: must be a finite number");
    }
}
