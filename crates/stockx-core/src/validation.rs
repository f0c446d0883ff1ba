//! # Validation Module
//!
//! Input validation for the StockX ledger.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum)                                       │
//! │  └── Type validation (JSON deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, formats                                 │
//! │  └── Quantity and price ranges                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger transaction (stockx-db)                               │
//! │  ├── Tenant ownership of referenced rows                               │
//! │  └── Conditional debit (stock_on_hand >= quantity)                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: Database (SQLite)                                            │
//! │  ├── UNIQUE(code), UNIQUE(barcode), UNIQUE(stocks.product_id)          │
//! │  └── CHECK(stock_on_hand >= 0)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockx_core::validation::{validate_code, validate_quantity};
//!
//! assert!(validate_code("ABC123").is_ok());
//! assert!(validate_quantity("quantity_sold", 3).is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{NewProduct, ProductUpdate};
use crate::{MAX_LEDGER_QUANTITY, MAX_PRICE_CENTS, MAX_PRODUCT_CODE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length for names (products, catalog entries, stores, actors).
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a size value such as "42" or "XL".
pub const MAX_SIZE_VALUE_LEN: usize = 6;

/// Maximum length of a color code.
pub const MAX_COLOR_CODE_LEN: usize = 10;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty or whitespace-only values.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Required, at most `max` characters.
pub fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    validate_required(field, value)?;

    if value.trim().chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty
/// - At most 10 characters
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use stockx_core::validation::validate_code;
///
/// assert!(validate_code("ABC123").is_ok());
/// assert!(validate_code("").is_err());
/// assert!(validate_code("ABCDEFGHIJK").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<()> {
    validate_name("code", code, MAX_PRODUCT_CODE_LEN)?;

    if !code
        .trim()
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name, MAX_NAME_LEN)
}

/// Validates the actor recorded as `created_by` / `sold_by` / `modified_by`.
pub fn validate_actor(actor: &str) -> ValidationResult<()> {
    validate_name("actor", actor, MAX_NAME_LEN)
}

/// Validates a color code. Codes starting with `#` must be 3 or 6 hex digits.
///
/// ```rust
/// use stockx_core::validation::validate_color_code;
///
/// assert!(validate_color_code("#FF0000").is_ok());
/// assert!(validate_color_code("#F00").is_ok());
/// assert!(validate_color_code("#GG0000").is_err());
/// assert!(validate_color_code("navy").is_ok());
/// ```
pub fn validate_color_code(code: &str) -> ValidationResult<()> {
    validate_name("color_code", code, MAX_COLOR_CODE_LEN)?;

    if let Some(hex) = code.trim().strip_prefix('#') {
        let valid_len = hex.len() == 3 || hex.len() == 6;
        if !valid_len || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidFormat {
                field: "color_code".to_string(),
                reason: "hex colors must be #RGB or #RRGGBB".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_size_value(value: &str) -> ValidationResult<()> {
    validate_name("size_value", value, MAX_SIZE_VALUE_LEN)
}

/// Accepts absolute http(s) URLs only.
pub fn validate_image_url(url: &str) -> ValidationResult<()> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    match rest {
        Some(host) if !host.is_empty() && !url.contains(char::is_whitespace) => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "image_url".to_string(),
            reason: "must be an http or https URL".to_string(),
        }),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a ledger quantity (stock-in, stock-out, sale).
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LEDGER_QUANTITY
pub fn validate_quantity(field: &str, quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if quantity > MAX_LEDGER_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_LEDGER_QUANTITY,
        });
    }

    Ok(())
}

/// Like [`validate_quantity`] but zero is allowed (initial quantity, thresholds).
pub fn validate_stock_level(field: &str, level: i64) -> ValidationResult<()> {
    if !(0..=MAX_LEDGER_QUANTITY).contains(&level) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_LEDGER_QUANTITY,
        });
    }
    Ok(())
}

/// Prices are cents in `0..=MAX_PRICE_CENTS`.
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Field-level checks for a new product. Store ownership of the referenced
/// catalog rows is checked later, inside the creating transaction.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_code(&product.code)?;
    validate_stock_level("initial_quantity", product.initial_quantity)?;
    validate_price_cents("cost_price_cents", product.cost_price_cents)?;
    validate_price_cents("selling_price_cents", product.selling_price_cents)?;

    if let Some(threshold) = product.low_stock_threshold {
        validate_stock_level("low_stock_threshold", threshold)?;
    }
    if let Some(barcode) = &product.barcode {
        validate_name("barcode", barcode, MAX_NAME_LEN)?;
    }
    if let Some(url) = &product.image_url {
        validate_image_url(url)?;
    }
    for (field, value) in [("supplier", &product.supplier), ("location", &product.location)] {
        if let Some(value) = value {
            validate_name(field, value, MAX_NAME_LEN)?;
        }
    }

    Ok(())
}

/// Field-level checks for the fields a [`ProductUpdate`] sets.
pub fn validate_product_update(update: &ProductUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.name {
        validate_product_name(name)?;
    }
    for (field, value) in [
        ("cost_price_cents", update.cost_price_cents),
        ("selling_price_cents", update.selling_price_cents),
    ] {
        if let Some(cents) = value {
            validate_price_cents(field, cents)?;
        }
    }
    if let Some(threshold) = update.low_stock_threshold {
        validate_stock_level("low_stock_threshold", threshold)?;
    }
    if let Some(url) = &update.image_url {
        validate_image_url(url)?;
    }
    for (field, value) in [
        ("barcode", &update.barcode),
        ("supplier", &update.supplier),
        ("location", &update.location),
    ] {
        if let Some(value) = value {
            validate_name(field, value, MAX_NAME_LEN)?;
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> NewProduct {
        NewProduct {
            name: "Runner".into(),
            code: "ABC123".into(),
            initial_quantity: 10,
            cost_price_cents: 500,
            selling_price_cents: 800,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_code() {
        assert!(validate_code("ABC123").is_ok());
        assert!(validate_code("A-1_b").is_ok());
        assert!(validate_code("1234567890").is_ok());

        assert!(matches!(
            validate_code("  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_code("12345678901"),
            Err(ValidationError::TooLong { max: 10, .. })
        ));
        assert!(matches!(
            validate_code("AB C"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("q", 1).is_ok());
        assert!(validate_quantity("q", MAX_LEDGER_QUANTITY).is_ok());
        assert!(matches!(
            validate_quantity("q", 0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_quantity("q", -3).is_err());
        assert!(matches!(
            validate_quantity("q", MAX_LEDGER_QUANTITY + 1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_stock_level_allows_zero() {
        assert!(validate_stock_level("initial_quantity", 0).is_ok());
        assert!(validate_stock_level("initial_quantity", -1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price_cents("cost", 0).is_ok());
        assert!(validate_price_cents("cost", -1).is_err());
        assert!(validate_price_cents("cost", MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents("cost", MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_price_cents("cost", i64::MAX).is_err());
    }

    #[test]
    fn test_validate_image_url() {
        assert!(validate_image_url("https://cdn.example.com/a.png").is_ok());
        assert!(validate_image_url("ftp://x").is_err());
        assert!(validate_image_url("https://").is_err());
        assert!(validate_image_url("https://a b").is_err());
    }

    #[test]
    fn test_validate_new_product() {
        assert!(validate_new_product(&product()).is_ok());

        let mut p = product();
        p.initial_quantity = -1;
        assert!(validate_new_product(&p).is_err());

        let mut p = product();
        p.low_stock_threshold = Some(-5);
        assert!(validate_new_product(&p).is_err());

        let mut p = product();
        p.supplier = Some(String::new());
        assert!(matches!(
            validate_new_product(&p),
            Err(ValidationError::Required { ref field }) if field == "supplier"
        ));
    }

    #[test]
    fn test_validate_product_update() {
        assert!(validate_product_update(&ProductUpdate::default()).is_ok());

        let update = ProductUpdate {
            selling_price_cents: Some(-5),
            ..Default::default()
        };
        assert!(matches!(
            validate_product_update(&update),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "selling_price_cents"
        ));

        let update = ProductUpdate {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(validate_product_update(&update).is_err());
    }
}
