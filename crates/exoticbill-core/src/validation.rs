//! # Validation Module
//!
//! Input validation for ExoticBill.
//!
//! All validation runs before any write for a given logical operation:
//! a request that fails here leaves the store untouched.
//!
//! ## Usage
//! ```rust
//! use exoticbill_core::validation::{validate_cid, validate_quantity};
//!
//! validate_cid("EMP-1042").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_LINE_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a CID (employee or customer identifier).
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
pub fn validate_cid(cid: &str) -> ValidationResult<()> {
    let cid = cid.trim();

    if cid.is_empty() {
        return Err(ValidationError::Required {
            field: "cid".to_string(),
        });
    }

    if cid.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "cid".to_string(),
            max: 50,
        });
    }

    if !cid
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "cid".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name (employee, item, or hood).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested item quantity.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the number of lines in an ITEMS sale.
pub fn validate_line_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if count > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    Ok(())
}

/// Validates a caller-supplied base amount (repair/upgrade/customization).
pub fn validate_base_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "base amount".to_string(),
        });
    }
    Ok(())
}

/// Validates a parts count for advanced repairs.
pub fn validate_parts_count(parts: i64) -> ValidationResult<()> {
    if parts <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "parts".to_string(),
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

    #[test]
    fn test_validate_cid() {
        assert!(validate_cid("EMP-1042").is_ok());
        assert!(validate_cid("  C77  ").is_ok());
        assert!(validate_cid("").is_err());
        assert!(validate_cid("has space").is_err());
        assert!(validate_cid(&"X".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("item", "Repair Kit").is_ok());
        assert!(validate_name("hood", "").is_err());
        assert!(validate_name("item", &"n".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_base_amount() {
        assert!(validate_base_amount(Money::from_rupees(100)).is_ok());
        assert!(validate_base_amount(Money::ZERO).is_err());
        assert!(validate_base_amount(Money::from_rupees(-5)).is_err());
    }
}
