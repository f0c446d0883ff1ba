//! # Repository Module
//!
//! Store-scoped repositories for the StockX ledger.
//!
//! ## Tenant Scoping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store-Scoped Repositories                            │
//! │                                                                         │
//! │  Handler                                                                │
//! │       │  let ctx = TenantContext::new(store, actor)?;                   │
//! │       │  db.sales(&ctx).record_sale(sale)                               │
//! │       ▼                                                                 │
//! │  SalesRecorder { pool, ctx }                                            │
//! │       │                                                                 │
//! │       │  every statement: ... WHERE store_id = ctx.store_id()           │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  A repository cannot be built without a context, so a query that       │
//! │  forgets the store filter has nowhere to get a store id from.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`StoreRepository`] - Users and stores (the tenant directory, unscoped)
//! - [`CatalogRepository`] - Categories, brands, size ranges, colors
//! - [`ProductRepository`] - Product creation and lookups
//! - [`StockLedger`] - Stock rows and the stock-transaction log
//! - [`SalesRecorder`] - Sales and the sales-transaction log
//! - [`ReportRepository`] - Aggregates and reconciliation

pub mod catalog;
pub mod product;
pub mod report;
pub mod sale;
pub mod stock;
pub mod store;

pub use catalog::{CatalogRecord, CatalogRepository};
pub use product::ProductRepository;
pub use report::ReportRepository;
pub use sale::SalesRecorder;
pub use stock::StockLedger;
pub use store::StoreRepository;

use std::collections::HashMap;

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use stockx_core::{CoreError, Product};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Generates a new entity id.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Opens a write transaction with `BEGIN IMMEDIATE`.
///
/// The write lock is taken at BEGIN, so reads issued before the first write
/// cannot hit SQLITE_BUSY on upgrade. Contending writers wait up to the
/// pool's busy timeout.
pub(crate) async fn begin_write(pool: &SqlitePool) -> DbResult<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(|e| match e {
            // e.g. the write lock was still held when the busy timeout ran out
            sqlx::Error::Database(db_err) => DbError::TransactionFailed(db_err.message().to_string()),
            other => other.into(),
        })
}

/// Fails with `StoreNotFound` unless the store exists.
pub(crate) async fn ensure_store(conn: &mut SqliteConnection, store_id: &str) -> DbResult<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM stores WHERE id = ?1")
        .bind(store_id)
        .fetch_optional(&mut *conn)
        .await?;

    match exists {
        Some(_) => Ok(()),
        None => Err(CoreError::StoreNotFound(store_id.to_string()).into()),
    }
}

/// Loads a product visible to `store_id`, colors included.
pub(crate) async fn find_product(
    conn: &mut SqliteConnection,
    store_id: &str,
    product_id: &str,
) -> DbResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE id = ?1 AND store_id = ?2",
    )
    .bind(product_id)
    .bind(store_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(mut product) = product else {
        return Ok(None);
    };

    product.colors = sqlx::query_scalar(
        "SELECT color_id FROM product_colors WHERE product_id = ?1 ORDER BY color_id",
    )
    .bind(&product.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(product))
}

/// Like [`find_product`] but a miss is `ProductNotFound`.
pub(crate) async fn require_product(
    conn: &mut SqliteConnection,
    store_id: &str,
    product_id: &str,
) -> DbResult<Product> {
    find_product(conn, store_id, product_id)
        .await?
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()).into())
}

/// Fills `colors` on a batch of products from one store with one query.
pub(crate) async fn attach_colors(
    conn: &mut SqliteConnection,
    store_id: &str,
    products: &mut [Product],
) -> DbResult<()> {
    if products.is_empty() {
        return Ok(());
    }

    let links: Vec<(String, String)> = sqlx::query_as(
        r#"
        SELECT pc.product_id, pc.color_id
        FROM product_colors pc
        INNER JOIN products p ON p.id = pc.product_id
        WHERE p.store_id = ?1
        ORDER BY pc.color_id
        "#,
    )
    .bind(store_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_product: HashMap<String, Vec<String>> = HashMap::new();
    for (product_id, color_id) in links {
        by_product.entry(product_id).or_default().push(color_id);
    }

    for product in products.iter_mut() {
        product.colors = by_product.remove(&product.id).unwrap_or_default();
    }

    Ok(())
}
