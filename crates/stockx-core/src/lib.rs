//! # stockx-core: Pure Business Logic for the StockX Ledger
//!
//! This crate holds the domain model of the stock-and-sales ledger as pure
//! types and functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StockX Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Chat bot / API clients                          │   │
//! │  │    Add Product ──► Record Sale ──► Manage Stock ──► Reports     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockx-api (axum)                            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stockx-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  report   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Report   │  │   rules   │  │   │
//! │  │   │   Stock   │  │           │  │  Ranking  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockx-db (Database Layer)                   │   │
//! │  │          SQLite ledger transactions, store-scoped repos         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Store, Product, Stock, transactions)
//! - [`context`] - The tenant context every ledger call carries
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`report`] - Pure assembly of the store report
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use stockx_core::money::Money;
//!
//! let selling_price = Money::from_cents(800); // $8.00
//! let total = selling_price.multiply_quantity(3);
//! assert_eq!(total.cents(), 2400);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod context;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use context::TenantContext;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{
    total_stock_value, ProductSales, Reconciliation, ReconciliationRow, Report, SellingRanking,
    StockTotals,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity accepted by a single ledger operation.
///
/// Guards against fat-finger entries ("10000" instead of "100") from the
/// chat front end. Per-store limits may replace this later.
pub const MAX_LEDGER_QUANTITY: i64 = 1_000_000;

/// Largest unit price, in cents ($10,000,000.00).
///
/// Keeps `stock_on_hand × cost_price` sums inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Low-stock threshold applied when a product does not specify one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 1;

/// Maximum length of a product code.
pub const MAX_PRODUCT_CODE_LEN: usize = 10;
