//! # Validation Module
//!
//! Input validation for cart requests and product records.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Points                                  │
//! │                                                                         │
//! │  update_product_amount(amount)                                          │
//! │  └── validate_amount ← before any stock lookup                          │
//! │                                                                         │
//! │  Catalog response (new product)                                         │
//! │  └── validate_product ← before it enters the cart                       │
//! │                                                                         │
//! │  Persisted cart (startup)                                               │
//! │  └── Cart::from_records ← drops entries with amount < 1                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::Product;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a requested cart amount.
///
/// ## Rules
/// - Must be at least 1. Removing a product is a separate operation, so
///   zero is not a shortcut for removal.
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_amount;
///
/// assert!(validate_amount(1).is_ok());
/// assert!(validate_amount(0).is_err());
/// assert!(validate_amount(-3).is_err());
/// ```
pub fn validate_amount(amount: i64) -> ValidationResult<()> {
    if amount < 1 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock record's available amount (must be non-negative).
pub fn validate_stock_amount(amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a catalog product before it enters the cart.
///
/// Title and image are display data and pass through untouched; only the
/// price is checked, since totals are computed from it.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(1).is_ok());
        assert!(validate_amount(500).is_ok());

        assert!(validate_amount(0).is_err());
        assert!(validate_amount(-1).is_err());
    }

    #[test]
    fn test_validate_stock_amount() {
        assert!(validate_stock_amount(0).is_ok());
        assert!(validate_stock_amount(-1).is_err());
    }

    #[test]
    fn test_validate_product() {
        let ok = Product::new(
            1,
            "Tênis de Caminhada Leve Confortável",
            Money::from_cents(17990),
            "a.jpg",
        );
        assert!(validate_product(&ok).is_ok());

        let free = Product::new(1, "Brinde", Money::zero(), "a.jpg");
        assert!(validate_product(&free).is_ok());

        let negative = Product::new(1, "Shoe", Money::from_cents(-1), "a.jpg");
        assert_eq!(
            validate_product(&negative),
            Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: i64::MAX,
            })
        );
    }

    #[test]
    fn test_validate_product_ignores_display_fields() {
        let blank = Product::new(1, "", Money::from_cents(100), "");
        assert!(validate_product(&blank).is_ok());

        let long = Product::new(1, "A".repeat(300), Money::from_cents(100), "a.jpg");
        assert!(validate_product(&long).is_ok());
    }
}
