//! # stockx-db: Database Layer for the StockX Ledger
//!
//! SQLite persistence for the ledger via sqlx: pool, embedded migrations
//! and store-scoped repositories.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StockX Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (POST /sales/create/)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     stockx-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (store-scoped)│    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ StockLedger   │    │ 001_initial_ │  │   │
//! │  │   │               │    │ SalesRecorder │    │ schema.sql   │  │   │
//! │  │   │               │    │ ReportRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (WAL, foreign keys on)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Store-scoped repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockx_core::{NewSale, TenantContext};
//! use stockx_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stockx.db")).await?;
//! let ctx = TenantContext::new(store_id, "alice")?;
//!
//! let sale = db.sales(&ctx).record_sale(&NewSale {
//!     product_id,
//!     quantity_sold: 3,
//!     unit_price_cents: None,
//! }).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{
    CatalogRecord, CatalogRepository, ProductRepository, ReportRepository, SalesRecorder, StockLedger,
    StoreRepository,
};
