//! # Domain Types
//!
//! Core domain types used throughout the StockX ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  User ──owns──► Store ◄── tenant root, every row below carries store_id│
//! │                   │                                                     │
//! │     ┌─────────────┼──────────────┬──────────────┬──────────────┐       │
//! │     ▼             ▼              ▼              ▼              ▼       │
//! │  Category       Brand        SizeRange        Color         Product    │
//! │                                                                │       │
//! │                        ┌───────────────────────┬───────────────┤       │
//! │                        ▼                       ▼               ▼       │
//! │                  Stock (1:1)         StockTransaction   SalesTransaction│
//! │                  stock_on_hand       quantity + type    qty × unit     │
//! │                                      (append-only)      (append-only)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4, immutable, used for database relations
//! - Business ID where one exists (`Product.code`, `User.tg_id`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Users & Stores
// =============================================================================

/// A person known to the system through the chat front end.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    /// Chat platform identity, unique.
    pub tg_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A tenant. Every catalog row, stock row and log entry belongs to one.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    /// User who owns the store.
    pub owner_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub tg_id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewStore {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Owning user id.
    pub owner: String,
}

// =============================================================================
// Catalog Reference Data
// =============================================================================

/// Product category, scoped to a store.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub store_id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Brand {
    pub id: String,
    pub store_id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A named size band, e.g. "EU Shoes - 42".
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SizeRange {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub size_value: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Color {
    pub id: String,
    pub store_id: String,
    pub name: String,
    /// Hex code such as `#FF0000`, or a free-form short label.
    pub color_code: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for any catalog entry. `detail` is the size value for size ranges
/// and the color code for colors; categories and brands ignore it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewCatalogEntry {
    pub name: String,
    #[serde(default, alias = "size_value", alias = "color_code")]
    pub detail: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product in a store's catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Store this product belongs to.
    pub store_id: String,

    pub name: String,

    /// Business identifier, unique system-wide and immutable.
    pub code: String,

    pub description: String,

    pub category_id: Option<String>,
    pub brand_id: Option<String>,
    pub size_range_id: Option<String>,

    /// Color ids linked through `product_colors`.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub colors: Vec<String>,

    /// Barcode, unique when present.
    pub barcode: Option<String>,

    /// Quantity the product was created with.
    pub initial_quantity: i64,

    /// Cost in cents, used for stock valuation.
    pub cost_price_cents: i64,

    /// Default unit price of a sale, in cents.
    pub selling_price_cents: i64,

    pub low_stock_threshold: i64,

    pub supplier: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,

    /// Actor that created the product.
    pub created_by: String,

    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }
}

/// Input for creating a product. Store and creator come from the tenant
/// context, not from this struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "category")]
    pub category_id: Option<String>,
    #[serde(default, alias = "brand")]
    pub brand_id: Option<String>,
    #[serde(default, alias = "size_range")]
    pub size_range_id: Option<String>,
    #[serde(default, alias = "colors")]
    pub color_ids: Vec<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub initial_quantity: i64,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    /// Falls back to [`crate::DEFAULT_LOW_STOCK_THRESHOLD`].
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial update of a product. `None` leaves a field unchanged.
///
/// `code` and `initial_quantity` are fixed at creation and have no field
/// here; stock levels change only through the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "category")]
    pub category_id: Option<String>,
    #[serde(default, alias = "brand")]
    pub brand_id: Option<String>,
    #[serde(default, alias = "size_range")]
    pub size_range_id: Option<String>,
    /// Replaces the whole color set when present.
    #[serde(default, alias = "colors")]
    pub color_ids: Option<Vec<String>>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub cost_price_cents: Option<i64>,
    #[serde(default)]
    pub selling_price_cents: Option<i64>,
    /// Also applied to the product's stock row.
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

// =============================================================================
// Stock
// =============================================================================

/// Current on-hand quantity for one product. At most one per product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Stock {
    pub id: String,
    pub store_id: String,
    pub product_id: String,
    /// Never negative.
    pub stock_on_hand: i64,
    pub low_stock_threshold: i64,
    pub created_by: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Stock {
    /// At or below the threshold.
    #[inline]
    pub fn is_low(&self) -> bool {
        self.stock_on_hand <= self.low_stock_threshold
    }

    /// Whether a debit of `quantity` can be satisfied.
    #[inline]
    pub fn can_debit(&self, quantity: i64) -> bool {
        quantity <= self.stock_on_hand
    }
}

// =============================================================================
// Stock Type
// =============================================================================

/// Direction of a ledger entry. Quantities are always stored as
/// non-negative magnitudes; this flag carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum StockType {
    /// Increases stock on hand.
    In,
    /// Decreases stock on hand (sale or manual correction).
    Out,
}

impl StockType {
    /// Applies the direction to a magnitude.
    #[inline]
    pub const fn apply(&self, quantity: i64) -> i64 {
        match self {
            StockType::In => quantity,
            StockType::Out => -quantity,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            StockType::In => "in",
            StockType::Out => "out",
        }
    }
}

impl Default for StockType {
    fn default() -> Self {
        StockType::In
    }
}

// =============================================================================
// Ledger Entries
// =============================================================================

/// One append-only stock adjustment.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockTransaction {
    pub id: String,
    pub store_id: String,
    pub product_id: String,
    /// Magnitude, always > 0.
    pub quantity: i64,
    pub stock_type: StockType,
    pub modified_by: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl StockTransaction {
    /// Quantity with the direction applied (OUT is negative).
    #[inline]
    pub fn signed_delta(&self) -> i64 {
        self.stock_type.apply(self.quantity)
    }
}

/// One append-only sale. `total_amount_cents` is frozen at write time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesTransaction {
    pub id: String,
    pub store_id: String,
    pub product_id: String,
    pub quantity_sold: i64,
    pub unit_price_cents: i64,
    pub total_amount_cents: i64,
    pub sold_by: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SalesTransaction {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// Input for recording a sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub product_id: String,
    pub quantity_sold: i64,
    /// Overrides the product's selling price when present.
    #[serde(default)]
    pub unit_price_cents: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stock(on_hand: i64, threshold: i64) -> Stock {
        Stock {
            id: "s-1".into(),
            store_id: "store-1".into(),
            product_id: "p-1".into(),
            stock_on_hand: on_hand,
            low_stock_threshold: threshold,
            created_by: "alice".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_stock_is_low_at_threshold() {
        assert!(stock(1, 1).is_low());
        assert!(stock(0, 1).is_low());
        assert!(!stock(2, 1).is_low());
    }

    #[test]
    fn test_can_debit_exact_amount() {
        let s = stock(7, 1);
        assert!(s.can_debit(7));
        assert!(!s.can_debit(8));
    }

    #[test]
    fn test_signed_delta() {
        let mut tx = StockTransaction {
            id: "t-1".into(),
            store_id: "store-1".into(),
            product_id: "p-1".into(),
            quantity: 3,
            stock_type: StockType::Out,
            modified_by: "alice".into(),
            created_at: Utc::now(),
        };
        assert_eq!(tx.signed_delta(), -3);

        tx.stock_type = StockType::In;
        assert_eq!(tx.signed_delta(), 3);
    }

    #[test]
    fn test_stock_type_serde() {
        assert_eq!(serde_json::to_string(&StockType::Out).unwrap(), "\"out\"");
        let parsed: StockType = serde_json::from_str("\"in\"").unwrap();
        assert_eq!(parsed, StockType::In);
    }

    #[test]
    fn test_new_product_accepts_reference_aliases() {
        let json = r#"{
            "name": "Runner",
            "code": "ABC123",
            "category": "c-1",
            "colors": ["red", "blue"],
            "cost_price_cents": 500,
            "selling_price_cents": 800
        }"#;
        let p: NewProduct = serde_json::from_str(json).unwrap();
        assert_eq!(p.category_id.as_deref(), Some("c-1"));
        assert_eq!(p.color_ids.len(), 2);
        assert_eq!(p.initial_quantity, 0);
        assert!(p.low_stock_threshold.is_none());
    }
}
