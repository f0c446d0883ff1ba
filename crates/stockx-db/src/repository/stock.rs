//! # Stock Ledger
//!
//! Current on-hand quantity per product plus the append-only
//! stock-transaction log. Every mutation changes the stock row and appends
//! the log entry in the same database transaction.
//!
//! ## Debit Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Check-and-decrement                                  │
//! │                                                                         │
//! │  ❌ WRONG: read then write (two sales both see 5, both sell 5)         │
//! │     SELECT stock_on_hand ...;  -- 5                                     │
//! │     UPDATE stocks SET stock_on_hand = 5 - 5 ...                         │
//! │                                                                         │
//! │  ✅ CORRECT: one conditional statement                                 │
//! │     UPDATE stocks SET stock_on_hand = stock_on_hand - ?1               │
//! │     WHERE product_id = ? AND store_id = ? AND stock_on_hand >= ?1      │
//! │     RETURNING *                                                         │
//! │                                                                         │
//! │  No row back? Then look at why: no stock row, or not enough of it.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mutating transactions open with `BEGIN IMMEDIATE`, so the write lock is
//! held before the first statement runs.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use stockx_core::validation::validate_quantity;
use stockx_core::{CoreError, Product, Stock, StockTransaction, StockType, TenantContext};
use tracing::{debug, info};

use super::{attach_colors, begin_write, new_id, require_product};
use crate::error::DbResult;

/// Store-scoped stock ledger.
#[derive(Debug, Clone)]
pub struct StockLedger {
    pool: SqlitePool,
    ctx: TenantContext,
}

impl StockLedger {
    pub fn new(pool: SqlitePool, ctx: TenantContext) -> Self {
        StockLedger { pool, ctx }
    }

    /// Applies one ledger entry and returns the resulting stock row.
    ///
    /// - `In`: creates the stock row at `quantity` or adds to it.
    /// - `Out`: manual correction, debited with the same sufficiency rule
    ///   as a sale.
    ///
    /// ## Returns
    /// * `Err(Core(ProductNotFound))` - product not in this store
    /// * `Err(Core(StockNotFound))` - `Out` on a product with no stock row
    /// * `Err(Core(InsufficientStock))` - `Out` larger than on-hand
    pub async fn adjust_stock(
        &self,
        product_id: &str,
        quantity: i64,
        stock_type: StockType,
    ) -> DbResult<Stock> {
        validate_quantity("quantity", quantity)?;

        let mut tx = begin_write(&self.pool).await?;
        let stock = match stock_type {
            StockType::In => stock_in(&mut tx, &self.ctx, product_id, quantity).await?,
            StockType::Out => stock_out(&mut tx, &self.ctx, product_id, quantity).await?,
        };
        tx.commit().await?;

        info!(
            store_id = %self.ctx.store_id(),
            product_id = %product_id,
            quantity,
            stock_type = stock_type.as_str(),
            actor = %self.ctx.actor(),
            stock_on_hand = stock.stock_on_hand,
            "Stock adjusted"
        );
        Ok(stock)
    }

    /// Adds to an existing stock row. Unlike `adjust_stock(In)` this never
    /// creates one.
    pub async fn restock(&self, product_id: &str, quantity: i64) -> DbResult<Stock> {
        validate_quantity("quantity", quantity)?;

        let mut tx = begin_write(&self.pool).await?;

        let updated = sqlx::query_as::<_, Stock>(
            r#"
            UPDATE stocks
            SET stock_on_hand = stock_on_hand + ?1, updated_at = ?2
            WHERE product_id = ?3 AND store_id = ?4
            RETURNING *
            "#,
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(product_id)
        .bind(self.ctx.store_id())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(stock) = updated else {
            let product = require_product(&mut tx, self.ctx.store_id(), product_id).await?;
            return Err(CoreError::StockNotFound(product.code).into());
        };

        append_transaction(&mut tx, &self.ctx, product_id, quantity, StockType::In).await?;
        tx.commit().await?;

        info!(
            product_id = %product_id,
            quantity,
            actor = %self.ctx.actor(),
            stock_on_hand = stock.stock_on_hand,
            "Stock restocked"
        );
        Ok(stock)
    }

    /// Pure read. `None` when the product has no stock row in this store.
    pub async fn get_stock(&self, product_id: &str) -> DbResult<Option<Stock>> {
        let stock = sqlx::query_as::<_, Stock>(
            "SELECT * FROM stocks WHERE product_id = ?1 AND store_id = ?2",
        )
        .bind(product_id)
        .bind(self.ctx.store_id())
        .fetch_optional(&self.pool)
        .await?;
        Ok(stock)
    }

    pub async fn list(&self) -> DbResult<Vec<Stock>> {
        let stocks = sqlx::query_as::<_, Stock>(
            "SELECT * FROM stocks WHERE store_id = ?1 ORDER BY created_at, id",
        )
        .bind(self.ctx.store_id())
        .fetch_all(&self.pool)
        .await?;
        Ok(stocks)
    }

    /// Products whose stock is at or below its threshold.
    pub async fn low_stock(&self) -> DbResult<Vec<Product>> {
        let mut conn = self.pool.acquire().await?;

        let mut products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.*
            FROM products p
            INNER JOIN stocks s ON s.product_id = p.id
            WHERE s.store_id = ?1
              AND p.store_id = ?1
              AND s.stock_on_hand <= s.low_stock_threshold
            ORDER BY s.stock_on_hand, p.code
            "#,
        )
        .bind(self.ctx.store_id())
        .fetch_all(&mut *conn)
        .await?;

        attach_colors(&mut conn, self.ctx.store_id(), &mut products).await?;

        debug!(count = products.len(), "Low-stock products");
        Ok(products)
    }

    /// Stock-transaction log, newest first, optionally for one product.
    pub async fn transactions(&self, product_id: Option<&str>) -> DbResult<Vec<StockTransaction>> {
        let rows = sqlx::query_as::<_, StockTransaction>(
            r#"
            SELECT * FROM stock_transactions
            WHERE store_id = ?1 AND (?2 IS NULL OR product_id = ?2)
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(self.ctx.store_id())
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// =============================================================================
// Transaction-level helpers (shared with products and sales)
// =============================================================================

/// Upserts the stock row and appends an IN entry.
///
/// The product must belong to the context's store; the insert selects from
/// `products` filtered by store, so a foreign product inserts nothing.
pub(crate) async fn stock_in(
    conn: &mut SqliteConnection,
    ctx: &TenantContext,
    product_id: &str,
    quantity: i64,
) -> DbResult<Stock> {
    let now = Utc::now();

    let stock = sqlx::query_as::<_, Stock>(
        r#"
        INSERT INTO stocks (
            id, store_id, product_id, stock_on_hand, low_stock_threshold,
            created_by, created_at, updated_at
        )
        SELECT ?1, p.store_id, p.id, ?2, p.low_stock_threshold, ?3, ?4, ?4
        FROM products p
        WHERE p.id = ?5 AND p.store_id = ?6
        ON CONFLICT(product_id) DO UPDATE SET
            stock_on_hand = stocks.stock_on_hand + excluded.stock_on_hand,
            updated_at = excluded.updated_at
        RETURNING *
        "#,
    )
    .bind(new_id())
    .bind(quantity)
    .bind(ctx.actor())
    .bind(now)
    .bind(product_id)
    .bind(ctx.store_id())
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    append_transaction(conn, ctx, product_id, quantity, StockType::In).await?;
    Ok(stock)
}

/// Conditionally debits the stock row and appends an OUT entry.
pub(crate) async fn stock_out(
    conn: &mut SqliteConnection,
    ctx: &TenantContext,
    product_id: &str,
    quantity: i64,
) -> DbResult<Stock> {
    let stock = debit(conn, ctx, product_id, quantity).await?;
    append_transaction(conn, ctx, product_id, quantity, StockType::Out).await?;
    Ok(stock)
}

/// The check-and-decrement. Does not touch the log.
async fn debit(
    conn: &mut SqliteConnection,
    ctx: &TenantContext,
    product_id: &str,
    quantity: i64,
) -> DbResult<Stock> {
    let debited = sqlx::query_as::<_, Stock>(
        r#"
        UPDATE stocks
        SET stock_on_hand = stock_on_hand - ?1, updated_at = ?2
        WHERE product_id = ?3 AND store_id = ?4 AND stock_on_hand >= ?1
        RETURNING *
        "#,
    )
    .bind(quantity)
    .bind(Utc::now())
    .bind(product_id)
    .bind(ctx.store_id())
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(stock) = debited {
        return Ok(stock);
    }

    let product = require_product(conn, ctx.store_id(), product_id).await?;
    let available: Option<i64> = sqlx::query_scalar(
        "SELECT stock_on_hand FROM stocks WHERE product_id = ?1 AND store_id = ?2",
    )
    .bind(product_id)
    .bind(ctx.store_id())
    .fetch_optional(&mut *conn)
    .await?;

    let err = match available {
        None => CoreError::StockNotFound(product.code),
        Some(available) => CoreError::InsufficientStock {
            code: product.code,
            available,
            requested: quantity,
        },
    };
    debug!(product_id = %product_id, error = %err, "Debit rejected");
    Err(err.into())
}

async fn append_transaction(
    conn: &mut SqliteConnection,
    ctx: &TenantContext,
    product_id: &str,
    quantity: i64,
    stock_type: StockType,
) -> DbResult<StockTransaction> {
    let entry = sqlx::query_as::<_, StockTransaction>(
        r#"
        INSERT INTO stock_transactions (
            id, store_id, product_id, quantity, stock_type, modified_by, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING *
        "#,
    )
    .bind(new_id())
    .bind(ctx.store_id())
    .bind(product_id)
    .bind(quantity)
    .bind(stock_type)
    .bind(ctx.actor())
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Ok(entry)
}
